/// Upper bounds (exclusive) of the reach id ranges assigned to each region, in lookup order.
///
/// The first three regions were numbered before the ranges were settled and sit
/// below the others.
const REGION_BOUNDS: [(&str, i64); 13] = [
    ("australia-geoglows", 300_000),
    ("middle_east-geoglows", 700_000),
    ("central_america-geoglows", 1_000_000),
    ("islands-geoglows", 2_000_000),
    ("japan-geoglows", 4_000_000),
    ("east_asia-geoglows", 5_000_000),
    ("south_asia-geoglows", 6_000_000),
    ("africa-geoglows", 8_000_000),
    ("central_asia-geoglows", 9_000_000),
    ("south_america-geoglows", 10_000_000),
    ("west_asia-geoglows", 11_000_000),
    ("europe-geoglows", 13_000_000),
    ("north_america-geoglows", 14_000_000),
];

/// Name of the delineation region whose id range contains `reach_id`.
///
/// Only the numbering is checked, not whether the reach exists.
///
/// ```
/// use geoglows::reach_to_region;
///
/// assert_eq!(reach_to_region(5_000_000), Some("south_asia-geoglows"));
/// assert_eq!(reach_to_region(9_007_292), Some("south_america-geoglows"));
/// assert_eq!(reach_to_region(20_000_000), None);
/// ```
pub fn reach_to_region(reach_id: i64) -> Option<&'static str> {
    REGION_BOUNDS
        .iter()
        .find(|(_, bound)| reach_id < *bound)
        .map(|(region, _)| *region)
}
