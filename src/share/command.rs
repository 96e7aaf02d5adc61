//! # Mount Command Construction
//!
//! Builds the external commands that (un)mount the share. Construction is a
//! pure function of the share configuration so the credential placement is
//! testable without spawning anything.
//!
//! On Windows the share path is a UNC name managed through `net use`. On
//! Unix the mount point is expected to have an fstab entry; credentials are
//! handed to `mount.cifs` through the child environment (`USER`/`PASSWD`)
//! so the password never appears in argv.

use std::process::Stdio;
use tokio::process::Command;

use crate::config::ShareConfig;

/// A fully resolved external command: program, arguments, and extra
/// environment for the child.
#[derive(Debug, Clone)]
pub struct ShareCommand {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl ShareCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            envs: Vec::new(),
        }
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Turn this description into a spawnable command. Output is piped, not
    /// inherited, so nothing the commands print reaches the gateway's log.
    pub fn build(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[cfg(windows)]
pub fn unmount_command(share: &ShareConfig) -> ShareCommand {
    ShareCommand::new(
        "net",
        vec![
            "use".to_string(),
            share.mount_path.display().to_string(),
            "/delete".to_string(),
            "/y".to_string(),
        ],
    )
}

#[cfg(windows)]
pub fn mount_command(share: &ShareConfig) -> ShareCommand {
    ShareCommand::new(
        "net",
        vec![
            "use".to_string(),
            share.mount_path.display().to_string(),
            format!("/user:{}", share.username),
            share.password.clone(),
        ],
    )
}

#[cfg(not(windows))]
pub fn unmount_command(share: &ShareConfig) -> ShareCommand {
    ShareCommand::new(
        "umount",
        vec![share.mount_path.display().to_string()],
    )
}

#[cfg(not(windows))]
pub fn mount_command(share: &ShareConfig) -> ShareCommand {
    ShareCommand::new("mount", vec![share.mount_path.display().to_string()])
        .env("USER", share.username.clone())
        .env("PASSWD", share.password.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn share() -> ShareConfig {
        ShareConfig {
            username: "svc_fotos".to_string(),
            password: "hunter2".to_string(),
            mount_path: PathBuf::from("/mnt/fotos"),
        }
    }

    #[cfg(not(windows))]
    #[test]
    fn unix_mount_keeps_the_password_out_of_argv() {
        let cmd = mount_command(&share());
        assert_eq!(cmd.program(), "mount");
        assert!(!cmd.args().iter().any(|arg| arg.contains("hunter2")));
        assert!(cmd
            .envs
            .iter()
            .any(|(k, v)| k == "PASSWD" && v == "hunter2"));
    }

    #[cfg(not(windows))]
    #[test]
    fn unix_unmount_targets_the_mount_point() {
        let cmd = unmount_command(&share());
        assert_eq!(cmd.program(), "umount");
        assert_eq!(cmd.args(), ["/mnt/fotos"]);
    }

    #[cfg(windows)]
    #[test]
    fn windows_mount_passes_user_and_password() {
        let cmd = mount_command(&share());
        assert_eq!(cmd.program(), "net");
        assert!(cmd.args().contains(&"/user:svc_fotos".to_string()));
        assert!(cmd.args().contains(&"hunter2".to_string()));
    }

    #[cfg(windows)]
    #[test]
    fn windows_unmount_forces_deletion() {
        let cmd = unmount_command(&share());
        assert_eq!(cmd.program(), "net");
        assert!(cmd.args().contains(&"/delete".to_string()));
        assert!(cmd.args().contains(&"/y".to_string()));
    }
}
