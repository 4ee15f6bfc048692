use rand::Rng;
use uuid::Uuid;

/// Generate a v4-format game id.
///
/// The bytes come from the game's own seeded RNG rather than system entropy,
/// so replaying a seed reproduces the game id along with everything else.
/// It is the first draw of a game.
pub fn generate_game_id(rng: &mut impl Rng) -> Uuid {
    let bytes: [u8; 16] = rng.gen();
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn same_seed_same_game_id() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(12345);
        let mut rng2 = ChaCha8Rng::seed_from_u64(12345);
        let id1 = generate_game_id(&mut rng1);
        let id2 = generate_game_id(&mut rng2);
        assert_eq!(id1, id2);
        assert_eq!(id1.get_version(), Some(uuid::Version::Random));
    }

    #[test]
    fn different_seeds_different_game_ids() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(1);
        let mut rng2 = ChaCha8Rng::seed_from_u64(2);
        assert_ne!(generate_game_id(&mut rng1), generate_game_id(&mut rng2));
    }
}
