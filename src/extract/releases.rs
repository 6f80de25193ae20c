//! Release identifiers from the release listing.

/// Marker text of a development snapshot block.
pub const DEV_MARKER: &str = "Development version";

/// One block of the release listing, with its links already located.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseBlock {
    pub text: String,
    /// Link in the release-info paragraph, used by development snapshots
    pub info_link: Option<String>,
    /// Bold field-content link of a tagged release
    pub tagged_link: Option<String>,
}

/// Release identifiers in listing order.
///
/// Blank blocks are skipped. A development block contributes its info link;
/// any block with a tagged link contributes that as well.
pub fn release_identifiers(blocks: &[ReleaseBlock]) -> Vec<String> {
    let mut releases = Vec::new();
    for block in blocks.iter().filter(|b| !b.text.trim().is_empty()) {
        if block.text.contains(DEV_MARKER) {
            releases.extend(block.info_link.as_deref().map(|l| l.trim().to_string()));
        }
        releases.extend(block.tagged_link.as_deref().map(|l| l.trim().to_string()));
    }
    releases
}
