/// Chance that `draws` cards taken without replacement from `unseen` cards,
/// `losing` of which lose, are all losing cards.
pub fn all_draws_lose(losing: usize, unseen: usize, draws: usize) -> f64 {
    if draws == 0 {
        return 1.0;
    }
    if unseen == 0 || losing < draws || unseen < draws {
        return 0.0;
    }
    (0..draws)
        .map(|drawn| (losing - drawn) as f64 / (unseen - drawn) as f64)
        .product()
}
