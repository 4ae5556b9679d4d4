//! Ge'ez numerals for the Amharic side of numeric fields.

const ONES: [char; 9] = ['፩', '፪', '፫', '፬', '፭', '፮', '፯', '፰', '፱'];
const TENS: [char; 9] = ['፲', '፳', '፴', '፵', '፶', '፷', '፸', '፹', '፺'];
const HUNDRED: char = '፻';
const TEN_THOUSAND: char = '፼';

/// Ge'ez has no zero; `0` is returned as the ASCII digit.
pub fn to_geez(n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut out = String::new();
    push_geez(n, &mut out);
    out
}

fn push_geez(n: u64, out: &mut String) {
    if n >= 10_000 {
        let (high, low) = (n / 10_000, n % 10_000);
        // A leading one before a multiplier is left implicit.
        if high > 1 {
            push_geez(high, out);
        }
        out.push(TEN_THOUSAND);
        if low > 0 {
            push_geez(low, out);
        }
    } else if n >= 100 {
        let (high, low) = (n / 100, n % 100);
        if high > 1 {
            push_pair(high, out);
        }
        out.push(HUNDRED);
        if low > 0 {
            push_pair(low, out);
        }
    } else {
        push_pair(n, out);
    }
}

fn push_pair(n: u64, out: &mut String) {
    let (tens, ones) = ((n / 10) as usize, (n % 10) as usize);
    if tens > 0 {
        out.push(TENS[tens - 1]);
    }
    if ones > 0 {
        out.push(ONES[ones - 1]);
    }
}

/// Replaces every run of ASCII digits in `text` with its Ge'ez form.
pub fn transliterate_digits(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        flush_digits(&mut digits, &mut out);
        out.push(c);
    }
    flush_digits(&mut digits, &mut out);
    out
}

fn flush_digits(digits: &mut String, out: &mut String) {
    if digits.is_empty() {
        return;
    }
    match digits.parse::<u64>() {
        Ok(n) => out.push_str(&to_geez(n)),
        Err(_) => out.push_str(digits),
    }
    digits.clear();
}
