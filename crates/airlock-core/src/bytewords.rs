//! Bytewords — the human-transcribable byte codec carried in every fragment.
//!
//! Each byte maps to one of 256 four-letter words. A CRC-32 of the body is
//! appended before encoding, so every decoded fragment is self-verifying:
//! a single mistyped or mis-scanned letter fails decoding instead of
//! reaching the fountain decoder.
//!
//! Three styles share the table:
//!   Standard — full words separated by spaces   ("able acid also ...")
//!   Uri      — full words separated by hyphens  ("able-acid-also-...")
//!   Minimal  — first and last letter, no separator ("aeadao...")
//! Multipart fragments always use Minimal.

use crate::checksum::{crc32, crc32_bytes};

/// All 256 words, four letters each, in byte order.
const WORDS: &[u8] = b"ableacidalsoapexaquaarchatomauntawayaxisbackbaldbarnbeltbetabiasbluebodybragbrewbulbbuzzcalmcashcatschefcityclawcodecolacookcostcruxcurlcuspcyandarkdatadaysdelidicedietdoordowndrawdropdrumdulldutyeacheasyechoedgeepicevenexamexiteyesfactfairfernfigsfilmfishfizzflapflewfluxfoxyfreefrogfuelfundgalagamegeargemsgiftgirlglowgoodgraygrimgurugushgyrohalfhanghardhawkheathelphighhillholyhopehornhutsicedideaidleinchinkyintoirisironitemjadejazzjoinjoltjowljudojugsjumpjunkjurykeepkenokeptkeyskickkilnkingkitekiwiknoblamblavalazyleaflegsliarlimplionlistlogoloudloveluaulucklungmainmanymathmazememomenumeowmildmintmissmonknailnavyneednewsnextnoonnotenumbobeyoboeomitonyxopenovalowlspaidpartpeckplaypluspoempoolposepuffpumapurrquadquizraceramprealredorichroadrockroofrubyruinrunsrustsafesagascarsetssilkskewslotsoapsolosongstubsurfswantacotasktaxitenttiedtimetinytoiltombtoystriptunatwinuglyundouniturgeuservastveryvetovialvibeviewvisavoidvowswallwandwarmwaspwavewaxywebswhatwhenwhizwolfworkyankyawnyellyogayurtzapszerozestzinczonezoom";

const _: () = assert!(WORDS.len() == 256 * 4);

/// Minimal-form lookup: `table[last * 26 + first]` is the byte value,
/// or -1 if no word has that first/last letter pair.
const LOOKUP: [i16; 26 * 26] = build_lookup();

const fn build_lookup() -> [i16; 26 * 26] {
    let mut table = [-1i16; 26 * 26];
    let mut i = 0;
    while i < 256 {
        let first = (WORDS[i * 4] - b'a') as usize;
        let last = (WORDS[i * 4 + 3] - b'a') as usize;
        table[last * 26 + first] = i as i16;
        i += 1;
    }
    table
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Standard,
    Uri,
    Minimal,
}

impl Style {
    fn separator(self) -> Option<char> {
        match self {
            Style::Standard => Some(' '),
            Style::Uri => Some('-'),
            Style::Minimal => None,
        }
    }
}

/// The full four-letter word for a byte.
pub fn word(byte: u8) -> &'static str {
    let start = byte as usize * 4;
    // WORDS is ASCII, so any 4-byte window on a word boundary is valid UTF-8.
    std::str::from_utf8(&WORDS[start..start + 4]).unwrap_or_default()
}

/// The two-letter minimal form for a byte.
pub fn minimal_word(byte: u8) -> [char; 2] {
    let start = byte as usize * 4;
    [WORDS[start] as char, WORDS[start + 3] as char]
}

/// Encode `data` with its CRC-32 appended.
pub fn encode(style: Style, data: &[u8]) -> String {
    let check = crc32_bytes(data);
    let bytes = data.iter().chain(check.iter()).copied();

    match style.separator() {
        None => {
            let mut out = String::with_capacity((data.len() + 4) * 2);
            for b in bytes {
                out.extend(minimal_word(b));
            }
            out
        }
        Some(sep) => {
            let mut out = String::with_capacity((data.len() + 4) * 5);
            for (i, b) in bytes.enumerate() {
                if i > 0 {
                    out.push(sep);
                }
                out.push_str(word(b));
            }
            out
        }
    }
}

/// Decode bytewords text, verify and strip the trailing CRC-32.
///
/// Letter case is ignored.
pub fn decode(style: Style, text: &str) -> Result<Vec<u8>, BytewordsError> {
    let mut bytes = match style.separator() {
        None => {
            let raw = text.as_bytes();
            if raw.len() % 2 != 0 {
                return Err(BytewordsError::InvalidLength(raw.len()));
            }
            raw.chunks_exact(2)
                .map(|w| decode_word(w, 2))
                .collect::<Result<Vec<u8>, _>>()?
        }
        Some(sep) => text
            .split(sep)
            .map(|w| decode_word(w.as_bytes(), 4))
            .collect::<Result<Vec<u8>, _>>()?,
    };

    if bytes.len() < 5 {
        return Err(BytewordsError::TooShort(bytes.len()));
    }

    let body_len = bytes.len() - 4;
    let actual = crc32(&bytes[..body_len]);
    let mut declared = [0u8; 4];
    declared.copy_from_slice(&bytes[body_len..]);
    let expected = u32::from_be_bytes(declared);
    if actual != expected {
        return Err(BytewordsError::ChecksumMismatch { expected, actual });
    }

    bytes.truncate(body_len);
    Ok(bytes)
}

fn decode_word(w: &[u8], word_len: usize) -> Result<u8, BytewordsError> {
    let invalid = || BytewordsError::InvalidWord(String::from_utf8_lossy(w).into_owned());

    if w.len() != word_len {
        return Err(invalid());
    }
    let first = w[0].to_ascii_lowercase();
    let last = w[word_len - 1].to_ascii_lowercase();
    if !first.is_ascii_lowercase() || !last.is_ascii_lowercase() {
        return Err(invalid());
    }

    let value = LOOKUP[(last - b'a') as usize * 26 + (first - b'a') as usize];
    if value < 0 {
        return Err(invalid());
    }

    if word_len == 4 {
        let start = value as usize * 4;
        let inner_ok = w[1..3]
            .iter()
            .zip(&WORDS[start + 1..start + 3])
            .all(|(got, want)| got.to_ascii_lowercase() == *want);
        if !inner_ok {
            return Err(invalid());
        }
    }

    Ok(value as u8)
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BytewordsError {
    #[error("invalid byteword: {0:?}")]
    InvalidWord(String),

    #[error("minimal bytewords must have even length, got {0}")]
    InvalidLength(usize),

    #[error("bytewords payload too short: {0} bytes, need at least 5")]
    TooShort(usize),

    #[error("bytewords checksum mismatch: declared 0x{expected:08x}, computed 0x{actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}
