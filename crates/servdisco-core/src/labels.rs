//! Hostname extraction from container routing labels
//!
//! A container declares its routable hostnames through Traefik router rule
//! labels: any key of the form `traefik.http.routers.<router>.rule` whose
//! value contains ``Host(`hostname`)`` tokens. The contract is exactly
//! "extract backtick-quoted arguments of `Host(...)`" and nothing more;
//! this is deliberately not a rule-language parser.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

const ROUTER_KEY_PREFIX: &str = "traefik.http.routers.";
const ROUTER_KEY_SUFFIX: &str = ".rule";

static HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Host\(`([^`]+)`\)").expect("host pattern compiles"));

/// Extract all hostnames declared in a container's routing labels
///
/// Hostnames are returned in order of appearance per label; duplicates are
/// retained at this stage (deduplication happens downstream via set
/// semantics). A label set with no matching keys yields an empty result,
/// never an error, and malformed rule values simply contribute nothing.
pub fn hosts_from_labels(labels: &HashMap<String, String>) -> Vec<String> {
    let mut hosts = Vec::new();

    for (key, value) in labels {
        if !key.starts_with(ROUTER_KEY_PREFIX) || !key.ends_with(ROUTER_KEY_SUFFIX) {
            continue;
        }

        for captures in HOST_RE.captures_iter(value) {
            hosts.push(captures[1].to_string());
        }
    }

    hosts
}
