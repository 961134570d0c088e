//! Link target classification: absolute public URLs open in a new tab,
//! anything else is an internal topic reference resolved to `<target>.html`.

use std::net::Ipv4Addr;

use url::{Host, Url};

/// The opening anchor fragment for a link target.
pub fn anchor_open(target: &str) -> String {
    if is_external(target) {
        format!("<a href=\"{target}\" target=\"_blank\">")
    } else {
        format!("<a href=\"{target}.html\">")
    }
}

/// An external target is an absolute `http`/`https`/`ftp` URL whose host is
/// either a dotted domain with an alphabetic TLD or a public IPv4 address.
/// Protocol-relative targets resolve as https. Loopback, private, link-local,
/// and multicast/reserved addresses stay internal, as do single-label hosts
/// and IPv6 literals.
pub fn is_external(target: &str) -> bool {
    let candidate = if let Some(rest) = target.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        target.to_string()
    };
    let Ok(url) = Url::parse(&candidate) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https" | "ftp") {
        return false;
    }
    match url.host() {
        Some(Host::Domain(domain)) => has_public_tld(domain),
        Some(Host::Ipv4(addr)) => is_public_ipv4(addr),
        Some(Host::Ipv6(_)) | None => false,
    }
}

fn has_public_tld(domain: &str) -> bool {
    let Some((_, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    tld.len() >= 2 && tld.chars().all(char::is_alphabetic)
}

fn is_public_ipv4(addr: Ipv4Addr) -> bool {
    let leading = addr.octets()[0];
    !(addr.is_private()
        || addr.is_loopback()
        || addr.is_link_local()
        || leading == 0
        || leading >= 224)
}

#[cfg(test)]
mod tests {
    use super::{anchor_open, is_external};

    #[test]
    fn public_urls_are_external() {
        assert!(is_external("https://example.com"));
        assert!(is_external("http://sub.example.co.uk/path?q=1#frag"));
        assert!(is_external("ftp://files.example.com"));
        assert!(is_external("//example.com/protocol-relative"));
        assert!(is_external("http://8.8.8.8/dns"));
        assert!(is_external("http://172.32.0.1/just-outside-private"));
    }

    #[test]
    fn non_urls_and_reserved_hosts_are_internal() {
        assert!(!is_external("topic123"));
        assert!(!is_external("example.com"));
        assert!(!is_external("mailto:someone@example.com"));
        assert!(!is_external("http://localhost:3000"));
        assert!(!is_external("http://127.0.0.1"));
        assert!(!is_external("http://10.0.0.1"));
        assert!(!is_external("http://192.168.1.1"));
        assert!(!is_external("http://172.16.0.1"));
        assert!(!is_external("http://169.254.1.1"));
        assert!(!is_external("http://0.1.2.3"));
        assert!(!is_external("http://224.0.0.1"));
        assert!(!is_external("http://[::1]/"));
    }

    #[test]
    fn anchors_carry_target_or_topic_suffix() {
        assert_eq!(
            anchor_open("https://example.com"),
            "<a href=\"https://example.com\" target=\"_blank\">"
        );
        assert_eq!(anchor_open("topic123"), "<a href=\"topic123.html\">");
    }
}
