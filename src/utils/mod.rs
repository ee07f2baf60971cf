pub mod config;

pub fn is_channel(target: &str) -> bool {
    target.starts_with('#') || target.starts_with('&')
}

pub fn normalize_channel_name(name: &str) -> String {
    name.to_lowercase()
}

pub fn normalize_nickname(nick: &str) -> String {
    nick.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_targets_use_a_marker() {
        assert!(is_channel("#lobby"));
        assert!(is_channel("&local"));
        assert!(!is_channel("alice"));
    }

    #[test]
    fn keys_are_case_folded() {
        assert_eq!(normalize_nickname("Alice"), "alice");
        assert_eq!(normalize_channel_name("#Lobby"), "#lobby");
    }
}
