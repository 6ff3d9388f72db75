/// Final tally of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
}

impl FinalScore {
    #[must_use]
    pub fn new(score: u32, total: u32) -> Self {
        Self {
            score,
            total,
            percentage: percentage(score, total),
        }
    }
}

/// `round(score / total * 100)` with halves rounded up; 0 when `total` is 0.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score);
    let total = u64::from(total);
    let rounded = (score * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest() {
        assert_eq!(percentage(3, 4), 75);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 2), 50);
    }

    #[test]
    fn halves_round_up() {
        // 1/8 = 12.5%
        assert_eq!(percentage(1, 8), 13);
        // 1/40 = 2.5%
        assert_eq!(percentage(1, 40), 3);
    }

    #[test]
    fn bounds() {
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn final_score_carries_percentage() {
        let score = FinalScore::new(1, 2);
        assert_eq!(score, FinalScore { score: 1, total: 2, percentage: 50 });
    }
}
