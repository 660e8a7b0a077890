use std::io::Write;
use std::net::IpAddr;

use anyhow::Context as _;
use dnswall_lib::check_ip_addr;

/// Writes a verdict line for every address and returns whether all of them are
/// allowed.
pub fn check_addresses(addresses: &[IpAddr], out: &mut impl Write) -> anyhow::Result<bool> {
    let mut all_allowed = true;
    for &addr in addresses {
        let allowed = check_ip_addr(addr);
        all_allowed &= allowed;
        writeln!(out, "{}\t{}", addr, if allowed { "allow" } else { "block" })
            .with_context(|| format!("failed to write the verdict for {}", addr))?;
    }
    Ok(all_allowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_address() {
        let addresses: Vec<IpAddr> = ["171.64.78.27", "192.168.1.100", "::1", "2606:4700::1111"]
            .iter()
            .map(|addr| addr.parse().expect("should be a valid address"))
            .collect();

        let mut out = Vec::new();
        let all_allowed = check_addresses(&addresses, &mut out).expect("shouldn't have failed");

        assert!(!all_allowed);
        assert_eq!(
            String::from_utf8(out).expect("should be UTF-8"),
            "171.64.78.27\tallow\n192.168.1.100\tblock\n::1\tblock\n2606:4700::1111\tallow\n"
        );
    }

    #[test]
    fn all_public() {
        let addresses: Vec<IpAddr> = vec!["8.8.8.8".parse().expect("should be a valid address")];
        let mut out = Vec::new();
        assert!(check_addresses(&addresses, &mut out).expect("shouldn't have failed"));
    }
}
