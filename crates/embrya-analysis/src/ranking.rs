use embrya_core::models::embryo::EmbryoResult;

/// Reassign 1-based ranks across a patient's full embryo collection.
///
/// Ordering is by derived viability score descending; ties keep their
/// insertion order (the sort is explicitly stable). Runs over the whole
/// collection so `rank` is globally consistent after every mutation.
pub fn assign_ranks(embryos: &mut [EmbryoResult]) {
    assign_ranks_scoped(embryos, |_| true);
}

/// Like [`assign_ranks`], restricted to the records `in_scope` accepts.
///
/// The app holds every patient's embryos in one collection; ranking must
/// stay consistent within each patient, not across them.
pub fn assign_ranks_scoped(embryos: &mut [EmbryoResult], in_scope: impl Fn(&EmbryoResult) -> bool) {
    let mut order: Vec<usize> = embryos
        .iter()
        .enumerate()
        .filter(|(_, embryo)| in_scope(embryo))
        .map(|(index, _)| index)
        .collect();
    order.sort_by(|&a, &b| {
        embryos[b]
            .viability_score
            .partial_cmp(&embryos[a].viability_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (position, &index) in order.iter().enumerate() {
        embryos[index].rank = position as u32 + 1;
    }
}
