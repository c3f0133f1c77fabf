use super::*;

pub const REFERENCE_CITIES: usize = 13;

/// Start city of the reference tour
pub const REFERENCE_START: City = 0;

/// Road distances in km between 13 cities, starting from city 0 (Istanbul).
pub const REFERENCE_DISTANCES: [[Distance; REFERENCE_CITIES]; REFERENCE_CITIES] = [
    [0, 453, 561, 243, 716, 660, 939, 771, 734, 893, 1363, 1124, 1067],
    [453, 0, 579, 382, 544, 258, 490, 318, 414, 440, 910, 671, 747],
    [561, 579, 0, 322, 444, 550, 900, 848, 993, 1019, 1418, 1105, 1326],
    [243, 382, 322, 0, 537, 487, 837, 689, 745, 822, 1281, 1042, 1078],
    [716, 544, 444, 537, 0, 322, 558, 618, 954, 813, 1076, 763, 1236],
    [660, 258, 550, 487, 322, 0, 356, 304, 640, 499, 874, 561, 922],
    [939, 490, 900, 837, 558, 356, 0, 333, 729, 429, 518, 205, 852],
    [771, 318, 848, 689, 618, 304, 333, 0, 449, 195, 592, 353, 618],
    [734, 414, 993, 745, 954, 640, 729, 449, 0, 338, 818, 725, 333],
    [893, 440, 1019, 822, 813, 499, 429, 195, 338, 0, 480, 425, 423],
    [1363, 910, 1418, 1281, 1076, 874, 518, 592, 818, 480, 0, 313, 627],
    [1124, 671, 1105, 1042, 763, 561, 205, 353, 725, 425, 313, 0, 841],
    [1067, 747, 1326, 1078, 1236, 922, 852, 618, 333, 423, 627, 841, 0],
];

pub fn reference_instance() -> DistanceMatrix {
    DistanceMatrix::from_fn(REFERENCE_CITIES as NumCities, |u, v| {
        REFERENCE_DISTANCES[u as usize][v as usize]
    })
}
