//! Hostname block parsing for inventory submissions
//!
//! Each line of the block is `hostname ip_address service port`, separated
//! by any whitespace. Fields past the fourth are ignored; lines with fewer
//! than four fields are skipped.

use infra_inventory_storage::HostService;
use tracing::debug;

/// Fields a line needs before it is accepted
pub const REQUIRED_FIELDS: usize = 4;

/// Parse a free-text hostname block into host/service entries
///
/// Never fails: blank lines and short lines are dropped silently (logged at
/// debug level), so an all-blank block yields an empty vector.
pub fn parse_hostname_block(text: &str) -> Vec<HostService> {
    let mut entries = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line_number = line_num + 1;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < REQUIRED_FIELDS {
            debug!(
                line = line_number,
                fields = parts.len(),
                "Skipping hostname line with too few fields"
            );
            continue;
        }

        entries.push(HostService {
            hostname: parts[0].to_string(),
            ip_address: parts[1].to_string(),
            service: parts[2].to_string(),
            port: parts[3].to_string(),
        });
    }

    entries
}
