// src/packages/linker.rs

//! Debug package linking
//!
//! `foo-debuginfo` and `foo-debugsource` hold the debug symbols and sources
//! of `foo`. The base package records their names so its page can point to
//! them.

use super::{DEBUGINFO_SUFFIX, DEBUGSOURCE_SUFFIX, PackageMap};
use crate::error::{Error, Result};
use tracing::debug;

/// Link every debug package in `packages` to its base package
///
/// `packages` must hold the packages of a single repository. A debug package
/// whose base package is missing is an error: the index is inconsistent.
pub fn link_debug_packages(packages: &mut PackageMap) -> Result<()> {
    let debug_names: Vec<String> = packages
        .keys()
        .filter(|name| name.ends_with(DEBUGINFO_SUFFIX) || name.ends_with(DEBUGSOURCE_SUFFIX))
        .cloned()
        .collect();

    for debug_name in debug_names {
        let (base_name, is_source) = match debug_name.strip_suffix(DEBUGINFO_SUFFIX) {
            Some(base) => (base, false),
            None => match debug_name.strip_suffix(DEBUGSOURCE_SUFFIX) {
                Some(base) => (base, true),
                None => continue,
            },
        };

        let base = packages
            .get_mut(base_name)
            .ok_or_else(|| Error::MissingDebugBase {
                debug_name: debug_name.clone(),
                base_name: base_name.to_string(),
            })?;

        debug!("Linking {} to {}", debug_name, base_name);
        if is_source {
            base.debugsource_package = Some(debug_name.clone());
        } else {
            base.debuginfo_package = Some(debug_name.clone());
        }
    }

    Ok(())
}
