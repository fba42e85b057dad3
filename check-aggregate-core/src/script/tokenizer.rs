/// Function names start with this character.
pub const FUNCTION_SIGIL: char = '@';

const QUOTE: char = '"';

/// Raw script token, before references are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme {
    Function(String),
    Open,
    Close,
    Word(String),
}

/// Splits script text on whitespace and commas. Parentheses are tokens of
/// their own wherever they appear outside quotes, so `@max(a))` yields
/// `@max`, `(`, `a`, `)`, `)`. Quote characters are dropped; between them
/// commas and parentheses are kept verbatim, but whitespace still ends the
/// word.
pub fn tokenize(input: &str) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();
    let mut word = String::new();
    let mut quoted = false;

    for ch in input.chars() {
        if ch == QUOTE {
            quoted = !quoted;
            continue;
        }

        if ch.is_whitespace() {
            flush_word(&mut word, &mut lexemes);
            quoted = false;
            continue;
        }

        if quoted {
            word.push(ch);
            continue;
        }

        match ch {
            ',' => flush_word(&mut word, &mut lexemes),
            '(' => {
                flush_word(&mut word, &mut lexemes);
                lexemes.push(Lexeme::Open);
            }
            ')' => {
                flush_word(&mut word, &mut lexemes);
                lexemes.push(Lexeme::Close);
            }
            other => word.push(other),
        }
    }
    flush_word(&mut word, &mut lexemes);

    lexemes
}

fn flush_word(word: &mut String, lexemes: &mut Vec<Lexeme>) {
    if word.is_empty() {
        return;
    }
    let text = std::mem::take(word);
    if text.starts_with(FUNCTION_SIGIL) {
        lexemes.push(Lexeme::Function(text));
    } else {
        lexemes.push(Lexeme::Word(text));
    }
}

/// Joins script file lines into one script, dropping `#` comment lines.
pub fn join_script_lines(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ")
}
