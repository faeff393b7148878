//! Release version comparison.

fn components(version: &str) -> [u64; 3] {
    let trimmed = version.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let mut parts = trimmed.split('.');
    // Missing or non-numeric components count as zero.
    std::array::from_fn(|_| {
        parts
            .next()
            .and_then(|part| part.trim().parse().ok())
            .unwrap_or(0)
    })
}

/// Returns whether `latest` is strictly newer than `current`.
///
/// A leading `v` is ignored and only the first three dot-separated components are compared, so
/// `1.0` and `1.0.0` are equal.
pub fn is_newer_version(current: &str, latest: &str) -> bool {
    components(latest) > components(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compares_three_components_left_to_right() {
        assert!(is_newer_version("1.2.0", "1.2.1"));
        assert!(is_newer_version("v1.9.9", "v2.0.0"));
        assert!(!is_newer_version("2.0.0", "1.9.9"));
        assert!(!is_newer_version("1.2.3", "1.2.3"));
    }

    #[test]
    fn missing_components_are_zero() {
        assert!(!is_newer_version("1.0", "1.0.0"));
        assert!(!is_newer_version("1.0.0", "v1.0"));
        assert!(is_newer_version("1", "1.0.1"));
    }

    #[test]
    fn fourth_component_and_garbage_are_ignored() {
        assert!(!is_newer_version("1.2.3", "1.2.3.9"));
        assert!(!is_newer_version("1.2.3", "1.2.3-beta"));
        assert!(is_newer_version("1.2.x", "1.2.1"));
    }
}
