use url::Url;

/// Check whether `rp_id` may be claimed by a caller at `origin`.
///
/// Valid iff the origin parses, uses https (plain http is only tolerated for
/// localhost development origins) and `rp_id` equals the origin host or is a
/// dot-boundary suffix of it that still contains the host's registrable
/// domain. The registrable-domain requirement is what stops
/// `evilexample.com` from passing for `rp_id = "example.com"` and stops an
/// rp_id of just `"com"`.
pub fn is_valid_rp_id(rp_id: &str, origin: &str) -> bool {
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let rp_id = rp_id.to_ascii_lowercase();

    let is_localhost = host == "localhost" || host.ends_with(".localhost");
    if url.scheme() != "https" && !is_localhost {
        return false;
    }
    if is_localhost {
        return rp_id == host || host.ends_with(&format!(".{rp_id}"));
    }

    if rp_id == host {
        return true;
    }
    if !host.ends_with(&format!(".{rp_id}")) {
        return false;
    }
    // A suffix match must still span a full registrable domain.
    match psl::domain_str(&host) {
        Some(registrable) => rp_id == registrable || rp_id.ends_with(&format!(".{registrable}")),
        None => false,
    }
}
