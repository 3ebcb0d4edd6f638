use shakmaty::{Chess, Position, san::SanPlus};
use std::str::SplitWhitespace;

/// One decoded ply. Tokens are opaque to the sorter: all it relies on is
/// that equal plies decode to equal tokens and that tokens are totally
/// ordered.
pub type MoveToken = u32;

/// Collaborator boundary for turning a record's `move_blob` into per-ply
/// tokens. Streams are lazy and restartable: calling `decode` again
/// replays the same blob from the start.
pub trait MoveDecoder {
    fn decode<'a>(&self, blob: &'a [u8]) -> Box<dyn Iterator<Item = MoveToken> + 'a>;
}

/// Treats every blob byte as one ply token. This matches compressed
/// one-byte-per-ply encodings without defining anything about them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawByteDecoder;

impl MoveDecoder for RawByteDecoder {
    fn decode<'a>(&self, blob: &'a [u8]) -> Box<dyn Iterator<Item = MoveToken> + 'a> {
        Box::new(blob.iter().map(|&b| MoveToken::from(b)))
    }
}

/// Decodes a blob holding normalized SAN movetext (`1. e4 e5 2. Nf3 ...`).
/// Each mainline move is validated against the running position and
/// packed into a stable token; the stream ends at the first token that is
/// not a legal move, so malformed tails just read as shorter games.
#[derive(Debug, Clone, Copy, Default)]
pub struct SanMovetextDecoder;

impl MoveDecoder for SanMovetextDecoder {
    fn decode<'a>(&self, blob: &'a [u8]) -> Box<dyn Iterator<Item = MoveToken> + 'a> {
        let text = std::str::from_utf8(blob).unwrap_or("");
        Box::new(SanTokenStream {
            words: text.split_whitespace(),
            pos: Chess::default(),
            in_comment: false,
            done: false,
        })
    }
}

struct SanTokenStream<'a> {
    words: SplitWhitespace<'a>,
    pos: Chess,
    in_comment: bool,
    done: bool,
}

impl Iterator for SanTokenStream<'_> {
    type Item = MoveToken;

    fn next(&mut self) -> Option<MoveToken> {
        if self.done {
            return None;
        }
        loop {
            let word = match self.words.next() {
                Some(w) => w,
                None => {
                    self.done = true;
                    return None;
                }
            };

            if self.in_comment {
                if word.ends_with('}') {
                    self.in_comment = false;
                }
                continue;
            }
            if word.starts_with('{') {
                self.in_comment = !word.ends_with('}');
                continue;
            }
            if skip_token(word) {
                continue;
            }
            // PGN exporters often glue the move number to the move
            // ("1.e4", "3...Nf6"); the move itself must survive.
            let word = strip_move_number(word);
            if word.is_empty() {
                continue;
            }

            let san = word.trim_end_matches(['!', '?']);
            let token = match san.parse::<SanPlus>() {
                Ok(san) => match san.san.to_move(&self.pos) {
                    Ok(m) => {
                        let token = encode_move(&m);
                        self.pos.play_unchecked(m);
                        token
                    }
                    Err(_) => {
                        self.done = true;
                        return None;
                    }
                },
                Err(_) => {
                    self.done = true;
                    return None;
                }
            };
            return Some(token);
        }
    }
}

fn skip_token(word: &str) -> bool {
    // NAGs and result markers carry no ply of their own.
    word.starts_with('$') || word == "1-0" || word == "0-1" || word == "1/2-1/2" || word == "*"
}

/// Strips a `<digits>.`/`<digits>...` move-number prefix, leaving bare
/// numbers as the empty string and everything else untouched ("1/2-1/2"
/// has a digit but no dot right after it).
fn strip_move_number(word: &str) -> &str {
    let rest = word.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == word.len() || !rest.starts_with('.') {
        return word;
    }
    rest.trim_start_matches('.')
}

fn encode_move(m: &shakmaty::Move) -> MoveToken {
    let from = m.from().map_or(64, |sq| sq as MoveToken);
    let to = m.to() as MoveToken;
    let promotion = m.promotion().map_or(0, |role| role as MoveToken);
    (from << 10) | (to << 4) | promotion
}

/// Result of classifying one blob: an opaque group id plus the number of
/// leading plies the grouping already accounts for (the popularity
/// refinement starts after them).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranspositionClass {
    pub group: i32,
    pub prefix_plies: usize,
}

/// Optional collaborator: maps a move-blob prefix to a transposition
/// group. When absent, ordering degrades to plain token order, which is
/// not an error.
pub trait TranspositionClassifier {
    fn classify(&self, blob: &[u8]) -> TranspositionClass;
}
