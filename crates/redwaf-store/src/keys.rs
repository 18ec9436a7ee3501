//! Key schema the firewall reads at request time

/// Hash of behaviour flags and strings
pub const CONFIG: &str = "waf:config";

/// Set of allow-listed client IPs
pub const IP_WHITELIST: &str = "waf:ip:whitelist";

/// Set of deny-listed client IPs
pub const IP_BLOCKLIST: &str = "waf:ip:blocklist";

/// Version counters the firewall polls for cache invalidation
pub const VERSION_CONFIG: &str = "waf:version:config";
pub const VERSION_RULES: &str = "waf:version:rules";
pub const VERSION_IP: &str = "waf:version:ip";

/// Set of rule patterns for one inspection category
pub fn rules(category: &str) -> String {
    format!("waf:rules:{}", category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_key_shape() {
        assert_eq!(rules("url"), "waf:rules:url");
        assert_eq!(rules("user-agent"), "waf:rules:user-agent");
    }
}
