//! Canonical bucketing of station info values for the stats surface
//!
//! Two families of transforms: installation paths collapse across the
//! per-user home-directory segment, and version strings collapse across
//! patch releases. Both are pure and only applied when the caller asks.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The fixed set of fields the stats endpoint may aggregate over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoField {
    StationType,
    StationModel,
    WeewxInfo,
    PythonInfo,
    PlatformInfo,
    ConfigPath,
    EntryPath,
}

/// Unknown `info_type` in a stats request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown info type '{0}'")]
pub struct UnknownInfoField(pub String);

impl FromStr for InfoField {
    type Err = UnknownInfoField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "station_type" => Ok(Self::StationType),
            "station_model" => Ok(Self::StationModel),
            "weewx_info" => Ok(Self::WeewxInfo),
            "python_info" => Ok(Self::PythonInfo),
            "platform_info" => Ok(Self::PlatformInfo),
            "config_path" => Ok(Self::ConfigPath),
            "entry_path" => Ok(Self::EntryPath),
            other => Err(UnknownInfoField(other.to_string())),
        }
    }
}

impl InfoField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StationType => "station_type",
            Self::StationModel => "station_model",
            Self::WeewxInfo => "weewx_info",
            Self::PythonInfo => "python_info",
            Self::PlatformInfo => "platform_info",
            Self::ConfigPath => "config_path",
            Self::EntryPath => "entry_path",
        }
    }
}

impl fmt::Display for InfoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consolidate one value of `field` into its canonical bucket.
///
/// Paths get the home-directory username wildcarded, version strings are
/// truncated to `MAJOR.MINOR`, everything else is returned unchanged.
pub fn consolidate(field: InfoField, value: &str) -> String {
    match field {
        InfoField::ConfigPath | InfoField::EntryPath => wildcard_user_segment(value),
        InfoField::WeewxInfo | InfoField::PythonInfo => major_minor(value),
        _ => value.to_string(),
    }
}

/// Home-directory prefixes whose following segment is a username
const HOME_PREFIXES: &[&[&str]] = &[&["home"], &["Users"], &["usr", "home"]];

/// Replace the per-user segment of an absolute path with `*`.
///
/// `/home/alice/weewx-data/weewx.conf` and `/home/bob/weewx-data/weewx.conf`
/// both map to `/home/*/weewx-data/weewx.conf`. Paths that do not start with
/// a recognized home prefix are returned unchanged.
pub fn wildcard_user_segment(path: &str) -> String {
    let Some(rest) = path.strip_prefix('/') else {
        return path.to_string();
    };
    let segments: Vec<&str> = rest.split('/').collect();

    for prefix in HOME_PREFIXES {
        // A username segment must exist beyond the prefix
        if segments.len() > prefix.len()
            && segments[..prefix.len()] == **prefix
            && !segments[prefix.len()].is_empty()
        {
            let mut out: Vec<&str> = Vec::with_capacity(segments.len());
            out.extend_from_slice(prefix);
            out.push("*");
            out.extend_from_slice(&segments[prefix.len() + 1..]);
            return format!("/{}", out.join("/"));
        }
    }
    path.to_string()
}

/// Truncate a `MAJOR.MINOR.PATCH` version to `MAJOR.MINOR`.
///
/// Values without at least two dot-separated components are returned
/// unchanged.
pub fn major_minor(version: &str) -> String {
    let mut parts = version.splitn(3, '.');
    match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => {
            format!("{}.{}", major, minor)
        }
        _ => version.to_string(),
    }
}
