//! # Path Rewriting
//!
//! Prefix rewrites applied to every forwarded path, first match wins. The
//! production table holds a single self-mapping for `/tate/tarjeta/fotos`,
//! kept so the backend's routing contract stays explicit.

/// Apply the first matching prefix rule, or return the path unchanged.
pub fn apply_rewrites(rewrites: &[(String, String)], path: &str) -> String {
    for (pattern, replacement) in rewrites {
        if let Some(rest) = path.strip_prefix(pattern.as_str()) {
            return format!("{}{}", replacement, rest);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<(String, String)> {
        vec![(
            "/tate/tarjeta/fotos".to_string(),
            "/tate/tarjeta/fotos".to_string(),
        )]
    }

    #[test]
    fn the_production_rule_is_a_no_op() {
        assert_eq!(
            apply_rewrites(&table(), "/tate/tarjeta/fotos/123"),
            "/tate/tarjeta/fotos/123"
        );
    }

    #[test]
    fn unmatched_paths_pass_through() {
        assert_eq!(apply_rewrites(&table(), "/otra/ruta"), "/otra/ruta");
    }

    #[test]
    fn a_real_rewrite_replaces_only_the_prefix() {
        let table = vec![("/viejo".to_string(), "/nuevo".to_string())];
        assert_eq!(apply_rewrites(&table, "/viejo/x"), "/nuevo/x");
        assert_eq!(apply_rewrites(&table, "/viejito"), "/nuevito");
    }

    #[test]
    fn first_match_wins() {
        let table = vec![
            ("/a/b".to_string(), "/uno".to_string()),
            ("/a".to_string(), "/dos".to_string()),
        ];
        assert_eq!(apply_rewrites(&table, "/a/b/c"), "/uno/c");
        assert_eq!(apply_rewrites(&table, "/a/x"), "/dos/x");
    }
}
