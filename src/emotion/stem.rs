//! Suffix-stripping stemmer
//!
//! A reduced Porter stemmer: it only needs to map inflected forms of the
//! same word onto one root ("worried", "worries", "worry" → "worri"), since
//! keywords and input tokens both pass through it. Tokens containing
//! anything other than ASCII lowercase letters are returned unchanged.

/// Derivational suffixes, longest first, with their replacement
const DERIVATIONAL: &[(&str, &str)] = &[
    ("fulness", "ful"),
    ("liness", ""),
    ("iness", "i"),
    ("ness", ""),
    ("fully", "ful"),
    ("ously", "ous"),
    ("iest", "i"),
    ("ier", "i"),
    ("ily", "i"),
    ("ly", ""),
];

/// Reduce a lowercase token to its root form
pub fn stem(word: &str) -> String {
    if word.len() <= 3 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
        return word.to_string();
    }

    let mut w = word.as_bytes().to_vec();
    strip_derivational(&mut w);
    strip_plural(&mut w);
    strip_past_and_progressive(&mut w);
    y_to_i(&mut w);
    drop_final_e(&mut w);

    String::from_utf8(w).unwrap_or_else(|_| word.to_string())
}

fn strip_derivational(w: &mut Vec<u8>) {
    for (suffix, replacement) in DERIVATIONAL {
        if w.ends_with(suffix.as_bytes()) {
            let stem_len = w.len() - suffix.len();
            if stem_len + replacement.len() >= 3 {
                w.truncate(stem_len);
                w.extend_from_slice(replacement.as_bytes());
            }
            return;
        }
    }
}

fn strip_plural(w: &mut Vec<u8>) {
    if w.ends_with(b"sses") {
        w.truncate(w.len() - 2);
    } else if w.ends_with(b"ies") {
        replace_ie_suffix(w, 3);
    } else if w.ends_with(b"ss") || w.ends_with(b"us") || w.ends_with(b"is") {
        // not plural
    } else if w.ends_with(b"s") && w.len() > 3 && has_vowel(&w[..w.len() - 1]) {
        w.pop();
    }
}

fn strip_past_and_progressive(w: &mut Vec<u8>) {
    if w.ends_with(b"eed") {
        if measure(&w[..w.len() - 3]) > 0 {
            w.pop();
        }
        return;
    }
    if w.ends_with(b"ied") {
        replace_ie_suffix(w, 3);
        return;
    }

    let suffix_len = if w.ends_with(b"ed") {
        2
    } else if w.ends_with(b"ing") {
        3
    } else {
        return;
    };

    let stem_len = w.len() - suffix_len;
    if stem_len < 2 || !has_vowel(&w[..stem_len]) {
        return;
    }
    w.truncate(stem_len);

    if ends_with_double_consonant(w) && !matches!(w.last(), Some(b'l' | b's' | b'z')) {
        w.pop();
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push(b'e');
    }
}

/// `-ies` / `-ied` become `-i`, or `-y` when nothing vowel-like precedes
/// ("worries" → "worri", "cried" → "cry").
fn replace_ie_suffix(w: &mut Vec<u8>, suffix_len: usize) {
    let stem_len = w.len() - suffix_len;
    let keep_i = has_vowel(&w[..stem_len]);
    w.truncate(stem_len);
    w.push(if keep_i { b'i' } else { b'y' });
}

fn y_to_i(w: &mut [u8]) {
    let n = w.len();
    if n > 1 && w[n - 1] == b'y' && has_vowel(&w[..n - 1]) {
        w[n - 1] = b'i';
    }
}

fn drop_final_e(w: &mut Vec<u8>) {
    if w.last() != Some(&b'e') {
        return;
    }
    let stem = &w[..w.len() - 1];
    let m = measure(stem);
    if m > 1 || (m == 1 && !ends_cvc(stem)) {
        w.pop();
    }
}

fn is_consonant(w: &[u8], i: usize) -> bool {
    match w[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(w, i - 1),
        _ => true,
    }
}

fn has_vowel(w: &[u8]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

/// Number of vowel→consonant transitions (Porter's `m`)
fn measure(w: &[u8]) -> usize {
    let mut m = 0;
    let mut prev_vowel = false;
    for i in 0..w.len() {
        let vowel = !is_consonant(w, i);
        if prev_vowel && !vowel {
            m += 1;
        }
        prev_vowel = vowel;
    }
    m
}

fn ends_with_double_consonant(w: &[u8]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// consonant-vowel-consonant ending, last consonant not w, x or y
fn ends_cvc(w: &[u8]) -> bool {
    let n = w.len();
    n >= 3
        && is_consonant(w, n - 3)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 1)
        && !matches!(w[n - 1], b'w' | b'x' | b'y')
}
