use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    let home = std::env::var("HOME").ok();
    expand_tilde_with(path, home.as_deref())
}

fn expand_tilde_with(path: &str, home: Option<&str>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => PathBuf::from(home),
        (_, Some(home)) => match path.strip_prefix("~/") {
            Some(rest) => PathBuf::from(home).join(rest),
            None => PathBuf::from(path),
        },
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix() {
        assert_eq!(
            expand_tilde_with("~/logs", Some("/home/ops")),
            PathBuf::from("/home/ops/logs")
        );
        assert_eq!(expand_tilde_with("~", Some("/home/ops")), PathBuf::from("/home/ops"));
    }

    #[test]
    fn leaves_other_paths_alone() {
        assert_eq!(
            expand_tilde_with("/etc/monitoring-control/config.toml", Some("/home/ops")),
            PathBuf::from("/etc/monitoring-control/config.toml")
        );
        assert_eq!(expand_tilde_with("~/logs", None), PathBuf::from("~/logs"));
    }
}
