//! Query input list construction.
//!
//! Two path references that share a non-empty prefix must be
//! *correlated*: bound through a common input-tuple column for that
//! prefix. The input list is the minimal set of such columns — the
//! non-empty longest common prefixes over the direct references
//! (against themselves, later direct references, and subquery
//! references), with lone references contributing themselves whole.

use crate::path::{longest_common_prefix, Path};

/// Collects every non-empty longest common prefix of the direct
/// references, scanning pairs `(direct[i], direct[i..] ∪ subquery)`.
/// A direct reference with no non-empty common prefix against any peer
/// is added unchanged.
fn find_common_prefixes(direct_refs: &[Path], subquery_refs: &[Path]) -> Vec<Path> {
    let mut prefixes: Vec<Path> = Vec::new();
    for (i, x) in direct_refs.iter().enumerate() {
        let mut added = false;
        for y in direct_refs[i..].iter().chain(subquery_refs) {
            let prefix = longest_common_prefix(x, y);
            if !prefix.is_empty() {
                if !prefixes.contains(&prefix) {
                    prefixes.push(prefix);
                }
                added = true;
            }
        }
        if !added && !prefixes.contains(x) {
            prefixes.push(x.clone());
        }
    }
    prefixes
}

/// Builds the additional query input list for one expression: the
/// common prefixes of its object-set-rooted direct references, minus
/// the paths already bound in the enclosing input list, in the stable
/// structural order.
pub(crate) fn make_query_input_list(
    direct_refs: &[Path],
    subquery_refs: &[Path],
    outer: &[Path],
) -> Vec<Path> {
    // Only object-set-rooted paths become bindings; partial paths and
    // expression roots resolve through other means.
    let bindable: Vec<Path> = direct_refs
        .iter()
        .filter(|p| p.starts_at_object_ref())
        .cloned()
        .collect();
    let mut qil: Vec<Path> = find_common_prefixes(&bindable, subquery_refs)
        .into_iter()
        .filter(|p| !outer.contains(p))
        .collect();
    qil.sort_by(|a, b| a.structural_cmp(b));
    qil
}
