use rand::Rng;
use rand::seq::SliceRandom;

/// Face value of a card. Two cells carrying the same symbol form a pair.
///
/// The core only compares symbols; what a symbol looks like on screen is the
/// presentation layer's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Symbol(pub u8);

/// Deals every symbol twice and shuffles the result into a fresh deck.
///
/// Pure aside from the RNG the caller supplies; production call sites pass
/// `rand::rng()` so consecutive rounds get distinct permutations.
pub fn build_deck<R: Rng + ?Sized>(symbols: &[Symbol], rng: &mut R) -> Vec<Symbol> {
    let mut deck = Vec::with_capacity(symbols.len() * 2);
    for &symbol in symbols {
        deck.push(symbol);
        deck.push(symbol);
    }
    deck.shuffle(rng);
    deck
}
