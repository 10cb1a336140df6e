//! Device-level configuration merge.

use crate::core::ConfigRequest;

/// Combine connected clients' requests into the single device request.
///
/// 5 GHz support and identity-change reporting are OR-folded; master
/// preference is max-folded. A request's cluster range participates in the
/// min/max range fold only when it narrows the full default range; with no
/// narrowed ranges the merged request keeps the default.
///
/// Returns `None` for an empty input: with no requesting clients the device
/// is disabled, not configured.
pub(crate) fn merge_requests<'a, I>(requests: I) -> Option<ConfigRequest>
where
    I: IntoIterator<Item = &'a ConfigRequest>,
{
    let mut merged: Option<ConfigRequest> = None;
    let mut range: Option<(u16, u16)> = None;

    for request in requests {
        let out = merged.get_or_insert_with(ConfigRequest::default);
        out.support_5g_band |= request.support_5g_band;
        out.identity_change_enabled |= request.identity_change_enabled;
        out.master_preference = out.master_preference.max(request.master_preference);

        if request.narrows_cluster_range() {
            range = Some(match range {
                None => (request.cluster_low, request.cluster_high),
                Some((low, high)) => (
                    low.min(request.cluster_low),
                    high.max(request.cluster_high),
                ),
            });
        }
    }

    let mut merged = merged?;
    if let Some((low, high)) = range {
        merged.cluster_low = low;
        merged.cluster_high = high;
    }
    Some(merged)
}
