use ordered_float::OrderedFloat;

/// Sorts `flows` descending and pairs each with its exceedance probability.
///
/// The probability of a flow is `rank / (n + 1)`, where `rank` is its 1-based
/// descending rank. Equal flows share the average of the ranks they span.
pub fn exceedance_probabilities(flows: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut sorted: Vec<f64> = flows.to_vec();
    sorted.sort_by_key(|v| std::cmp::Reverse(OrderedFloat(*v)));

    let n = sorted.len();
    let denominator = (n + 1) as f64;
    let mut probabilities = Vec::with_capacity(n);
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && sorted[end] == sorted[start] {
            end += 1;
        }
        // ranks start+1 ..= end
        let rank = (start + 1 + end) as f64 / 2.0;
        probabilities.extend(std::iter::repeat(rank / denominator).take(end - start));
        start = end;
    }
    (probabilities, sorted)
}
