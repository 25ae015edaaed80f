//! Address validation.

/// Returns true if `s` is four dot-separated groups of 1-3 ASCII digits,
/// each between 0 and 255.
///
/// Empty strings, CIDR suffixes and IPv6 are rejected. Leading zeros are
/// accepted as long as the group stays within three digits.
///
/// # Examples
///
/// ```
/// use netcfg::settings::is_valid_ipv4_like;
///
/// assert!(is_valid_ipv4_like("192.168.1.1"));
/// assert!(!is_valid_ipv4_like("256.1.1.1"));
/// assert!(!is_valid_ipv4_like("1.2.3"));
/// assert!(!is_valid_ipv4_like(""));
/// ```
#[must_use]
pub fn is_valid_ipv4_like(s: &str) -> bool {
    let groups: Vec<&str> = s.split('.').collect();
    groups.len() == 4 && groups.iter().all(|group| is_octet(group))
}

fn is_octet(group: &str) -> bool {
    (1..=3).contains(&group.len())
        && group.bytes().all(|b| b.is_ascii_digit())
        && group.parse::<u16>().is_ok_and(|value| value <= 255)
}
