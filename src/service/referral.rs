/// Referral links point back at the landing page with the signer's own fid
/// as the `ref` query parameter; the signup form carries it through to
/// `referral_source`.
pub fn generate_referral_link(base_url: &str, fid: &str) -> String {
    format!("{}?ref={}", base_url.trim_end_matches('/'), fid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_carries_the_fid_as_ref() {
        assert_eq!(
            generate_referral_link("https://knowempire.xyz", "3621"),
            "https://knowempire.xyz?ref=3621"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(
            generate_referral_link("https://knowempire.xyz/", "1"),
            "https://knowempire.xyz?ref=1"
        );
    }
}
