use crate::Rating;
use crate::Score;

/// expected score of the first player against the second
pub fn expected(a: Rating, b: Rating) -> Score {
    1. / (1. + 10f64.powf((b - a) as Score / 400.))
}

/// Standard Elo transition for one decided match. Both ratings move in
/// the same transition: winner gains K * (1 - E), loser loses K * E,
/// rounded to the nearest integer.
pub fn update(winner: Rating, loser: Rating) -> (Rating, Rating) {
    let w = winner as Score + crate::ELO_K * (1. - expected(winner, loser));
    let l = loser as Score + crate::ELO_K * (0. - expected(loser, winner));
    (w.round() as Rating, l.round() as Rating)
}
