//! Polyglot opening book: loading and lookup.
//!
//! The book file is a stream of 16-byte big-endian records `{u64 key,
//! u16 move, u16 weight, u32 learn}`, sorted ascending by key. The
//! loader coalesces consecutive records sharing a key into one entry
//! holding all the response moves, so lookup is a binary search over
//! unique keys followed by a uniform choice among the moves.
//!
//! Move fields pack five 3-bit values from the least significant bit:
//! to-file, to-row, from-file, from-row, promotion piece. Rows are
//! bottom-origin in the file and mirrored into engine ranks. Only
//! promotions to nothing or to a queen are usable here; records
//! promoting to anything else are dropped, as are a record's moves
//! beyond the 255th for one key. Weights and learn values are not
//! used and skipped.

use crate::board::{BoardPos, GameState, Move};
use crate::error::BookError;
use byteorder::{BigEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

const MOVE_FIELD_MASK: u16 = 0x7;
const TO_FILE_SHIFT: u16 = 0;
const TO_ROW_SHIFT: u16 = 3;
const FROM_FILE_SHIFT: u16 = 6;
const FROM_ROW_SHIFT: u16 = 9;
const PROMO_SHIFT: u16 = 12;

const PROMO_NONE: u16 = 0;
const PROMO_QUEEN: u16 = 4;

/// Moves a single book key maps to.
#[derive(Debug)]
struct BookEntry {
    hash: u64,
    moves: Vec<Move>,
}

/// An opening book, immutable once loaded.
#[derive(Debug)]
pub struct OpeningBook {
    entries: Vec<BookEntry>,
}

impl OpeningBook {
    /// Loads a book file. Missing, empty or unsorted books are
    /// errors: the engine treats its book as a required asset.
    pub fn load(path: &Path) -> Result<OpeningBook, BookError> {
        let file = File::open(path)?;
        let book = OpeningBook::from_reader(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            entries = book.entries.len(),
            "opening book loaded"
        );
        Ok(book)
    }

    /// Reads records until the stream ends. A trailing partial record
    /// is ignored.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<OpeningBook, BookError> {
        let mut entries: Vec<BookEntry> = Vec::new();

        loop {
            let hash = match reader.read_u64::<BigEndian>() {
                Ok(hash) => hash,
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(err) => return Err(err.into()),
            };
            let (packed, _weight, _learn) = match (
                reader.read_u16::<BigEndian>(),
                reader.read_u16::<BigEndian>(),
                reader.read_u32::<BigEndian>(),
            ) {
                (Ok(m), Ok(w), Ok(l)) => (m, w, l),
                // A truncated final record is dropped, not an error.
                (Err(err), ..) | (_, Err(err), _) | (.., Err(err))
                    if err.kind() == io::ErrorKind::UnexpectedEof =>
                {
                    break
                }
                (Err(err), ..) | (_, Err(err), _) | (.., Err(err)) => return Err(err.into()),
            };

            if let Some(last) = entries.last() {
                if hash < last.hash {
                    return Err(BookError::Unsorted);
                }
            }

            let promotion = (packed >> PROMO_SHIFT) & MOVE_FIELD_MASK;
            if promotion != PROMO_NONE && promotion != PROMO_QUEEN {
                continue;
            }

            let mv = decode_move(packed);
            match entries.last_mut() {
                Some(last) if last.hash == hash => {
                    // 255 moves per key; the format's weight-ordered
                    // tail beyond that is discarded.
                    if last.moves.len() < u8::MAX as usize {
                        last.moves.push(mv);
                    }
                }
                _ => entries.push(BookEntry {
                    hash,
                    moves: vec![mv],
                }),
            }
        }

        if entries.is_empty() {
            return Err(BookError::Empty);
        }

        Ok(OpeningBook { entries })
    }

    /// The response moves recorded for `hash`, if any.
    pub fn lookup(&self, hash: u64) -> Option<&[Move]> {
        self.entries
            .binary_search_by_key(&hash, |entry| entry.hash)
            .ok()
            .map(|index| self.entries[index].moves.as_slice())
    }

    /// Number of distinct keys in the book.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up the position's hash directly.
    pub fn lookup_position(&self, state: &GameState) -> Option<&[Move]> {
        self.lookup(state.hash)
    }
}

/// Unpacks a book move into engine coordinates (rows mirrored).
fn decode_move(packed: u16) -> Move {
    let to_file = ((packed >> TO_FILE_SHIFT) & MOVE_FIELD_MASK) as i8;
    let to_row = ((packed >> TO_ROW_SHIFT) & MOVE_FIELD_MASK) as i8;
    let from_file = ((packed >> FROM_FILE_SHIFT) & MOVE_FIELD_MASK) as i8;
    let from_row = ((packed >> FROM_ROW_SHIFT) & MOVE_FIELD_MASK) as i8;

    Move {
        from: BoardPos::new(from_file, 7 - from_row),
        to: BoardPos::new(to_file, 7 - to_row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn pack(from: (u16, u16), to: (u16, u16), promo: u16) -> u16 {
        // Coordinates here are Polyglot (file, bottom-origin row).
        (to.0 << TO_FILE_SHIFT)
            | (to.1 << TO_ROW_SHIFT)
            | (from.0 << FROM_FILE_SHIFT)
            | (from.1 << FROM_ROW_SHIFT)
            | (promo << PROMO_SHIFT)
    }

    fn record(hash: u64, packed: u16) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(16);
        bytes.extend_from_slice(&hash.to_be_bytes());
        bytes.extend_from_slice(&packed.to_be_bytes());
        bytes.extend_from_slice(&100u16.to_be_bytes()); // weight, unused
        bytes.extend_from_slice(&0u32.to_be_bytes()); // learn, unused
        bytes
    }

    fn book_from(records: &[Vec<u8>]) -> Result<OpeningBook, BookError> {
        let bytes: Vec<u8> = records.concat();
        OpeningBook::from_reader(Cursor::new(bytes))
    }

    #[test]
    fn decodes_moves_with_mirrored_rows() {
        // e2e4 in Polyglot coordinates: from (4, 1) to (4, 3).
        let book = book_from(&[record(7, pack((4, 1), (4, 3), 0))]).unwrap();
        let moves = book.lookup(7).unwrap();
        assert_eq!(
            moves,
            [Move::new(BoardPos::new(4, 6), BoardPos::new(4, 4))]
        );
    }

    #[test]
    fn every_record_is_findable_with_its_move() {
        let records: Vec<_> = (0..50u64)
            .map(|i| record(i * 3 + 1, pack((i as u16 % 8, 1), (i as u16 % 8, 3), 0)))
            .collect();
        let book = book_from(&records).unwrap();
        assert_eq!(book.len(), 50);

        for i in 0..50u64 {
            let moves = book.lookup(i * 3 + 1).expect("record must be found");
            let expected = decode_move(pack((i as u16 % 8, 1), (i as u16 % 8, 3), 0));
            assert!(moves.contains(&expected));
        }
        assert_eq!(book.lookup(2), None);
    }

    #[test]
    fn consecutive_records_with_one_hash_coalesce() {
        let book = book_from(&[
            record(9, pack((4, 1), (4, 3), 0)),
            record(9, pack((3, 1), (3, 3), 0)),
            record(10, pack((6, 0), (5, 2), 0)),
        ])
        .unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.lookup(9).unwrap().len(), 2);
        assert_eq!(book.lookup(10).unwrap().len(), 1);
    }

    #[test]
    fn non_queen_promotions_are_skipped() {
        let book = book_from(&[
            record(9, pack((4, 6), (4, 7), 2)), // rook promotion: dropped
            record(9, pack((4, 6), (4, 7), 4)), // queen promotion: kept
        ])
        .unwrap();
        assert_eq!(book.lookup(9).unwrap().len(), 1);
    }

    #[test]
    fn unsorted_books_are_rejected() {
        let result = book_from(&[
            record(20, pack((4, 1), (4, 3), 0)),
            record(10, pack((4, 1), (4, 3), 0)),
        ]);
        assert!(matches!(result, Err(BookError::Unsorted)));
    }

    #[test]
    fn empty_books_are_rejected() {
        assert!(matches!(book_from(&[]), Err(BookError::Empty)));
        // A book whose only record is an unusable promotion is empty
        // too.
        let result = book_from(&[record(9, pack((4, 6), (4, 7), 1))]);
        assert!(matches!(result, Err(BookError::Empty)));
    }

    #[test]
    fn trailing_partial_records_are_ignored() {
        let mut bytes = record(9, pack((4, 1), (4, 3), 0));
        bytes.extend_from_slice(&[1, 2, 3, 4, 5]);
        let book = OpeningBook::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn move_cap_per_hash_is_respected() {
        let records: Vec<_> = (0..300)
            .map(|i| record(9, pack((i % 8, 1), (i % 8, 3), 0)))
            .collect();
        let book = book_from(&records).unwrap();
        assert_eq!(book.lookup(9).unwrap().len(), 255);
    }
}
