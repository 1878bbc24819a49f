//! Queue shuffling
//!
//! Uses Fisher-Yates (`SliceRandom::shuffle`), so every ordering of the
//! remaining songs is equally likely.

use cadence_core::Song;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `songs` keeping the song at `pinned` in front.
///
/// Returns the songs unchanged (cloned) when `pinned` is out of range.
pub fn shuffle_pinned<R: Rng + ?Sized>(songs: &[Song], pinned: usize, rng: &mut R) -> Vec<Song> {
    let Some(current) = songs.get(pinned) else {
        return songs.to_vec();
    };

    let mut rest: Vec<Song> = songs
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != pinned)
        .map(|(_, song)| song.clone())
        .collect();
    rest.shuffle(rng);

    let mut shuffled = Vec::with_capacity(songs.len());
    shuffled.push(current.clone());
    shuffled.extend(rest);
    shuffled
}
