use std::{
    collections::HashSet,
    fs::{self, File},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use crate::errors::{Error, Result};

/// Token fields in column order: word, tag, chunk, entity, role.
const MAX_FIELDS: usize = 5;

/// A word of a sentence together with its gold and predicted labels.
///
/// Everything except the predicted label is fixed once the token is built;
/// decoders only ever write [`Token::predicted`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    literal: String,
    tag: Option<String>,
    predicted: Option<String>,
    index: usize,
    chunk: Option<String>,
    entity: Option<String>,
    role: Option<String>,
}

impl Token {
    pub fn new(literal: &str) -> Self {
        Self {
            literal: literal.to_string(),
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn with_chunk(mut self, chunk: &str) -> Self {
        self.chunk = Some(chunk.to_string());
        self
    }

    pub fn with_entity(mut self, entity: &str) -> Self {
        self.entity = Some(entity.to_string());
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    fn from_fields(fields: &[&str]) -> Self {
        let field = |i: usize| fields.get(i).map(|s| s.to_string());
        Self {
            literal: fields[0].to_string(),
            tag: field(1),
            chunk: field(2),
            entity: field(3),
            role: field(4),
            ..Default::default()
        }
    }

    /// The word as it appeared in the input, case preserved.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Gold tag, absent for unlabeled input.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn predicted(&self) -> Option<&str> {
        self.predicted.as_deref()
    }

    /// Position of the token in its sentence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn chunk(&self) -> Option<&str> {
        self.chunk.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn starts_with_capital(&self) -> bool {
        starts_with_capital(&self.literal)
    }

    pub(crate) fn set_predicted(&mut self, label: &str) {
        self.predicted = Some(label.to_string());
    }
}

pub(crate) fn starts_with_capital(s: &str) -> bool {
    s.chars().next().map_or(false, |c| c.is_ascii_uppercase())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    /// Appends a token, numbering it after the tokens already present.
    pub fn push(&mut self, mut token: Token) {
        token.index = self.tokens.len();
        self.tokens.push(token);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn predictions(&self) -> Vec<Option<&str>> {
        self.tokens.iter().map(Token::predicted).collect()
    }
}

impl FromIterator<Token> for Sentence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        let mut sentence = Sentence::default();
        for token in iter {
            sentence.push(token);
        }
        sentence
    }
}

/// Sentences of a labeled (or unlabeled) text with their vocabulary.
///
/// The vocabulary holds the lower-cased forms of every word and is only
/// rebuilt when corpora are concatenated.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    sentences: Vec<Sentence>,
    vocabulary: HashSet<String>,
}

impl Corpus {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        let vocabulary = sentences
            .iter()
            .flat_map(Sentence::iter)
            .map(|token| token.literal().to_lowercase())
            .collect();
        Self {
            sentences,
            vocabulary,
        }
    }

    /// Reads a corpus file, or every file below a directory in name order.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut sentences = Vec::new();
        read_path(path.as_ref(), &mut sentences)?;
        Ok(Self::new(sentences))
    }

    /// Reads sentences from `reader`; `path` only labels error messages.
    pub fn from_reader<R: BufRead, P: AsRef<Path>>(reader: R, path: P) -> Result<Self> {
        Ok(Self::new(read_sentences(reader, path.as_ref())?))
    }

    pub fn concat<I: IntoIterator<Item = Corpus>>(corpora: I) -> Self {
        let sentences = corpora
            .into_iter()
            .flat_map(|corpus| corpus.sentences)
            .collect();
        Self::new(sentences)
    }

    /// Case-insensitive vocabulary membership. Blank words are never known.
    pub fn contains_word(&self, word: &str) -> bool {
        if word.trim().is_empty() {
            return false;
        }
        self.vocabulary.contains(&word.to_lowercase())
    }

    pub fn vocabulary(&self) -> &HashSet<String> {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn sentences_mut(&mut self) -> &mut [Sentence] {
        &mut self.sentences
    }

    pub fn into_sentences(self) -> Vec<Sentence> {
        self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn total_tokens(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }

    pub fn max_length(&self) -> usize {
        self.sentences.iter().map(Sentence::len).max().unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

fn read_path(path: &Path, sentences: &mut Vec<Sentence>) -> Result<()> {
    if path.is_dir() {
        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<PathBuf>>>()?;
        entries.sort();
        for entry in entries {
            read_path(&entry, sentences)?;
        }
        Ok(())
    } else if path.is_file() {
        let f = File::open(path)?;
        sentences.extend(read_sentences(BufReader::new(f), path)?);
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{}: not a file or directory", path.display()),
        )
        .into())
    }
}

fn read_sentences<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Sentence>> {
    let mut sentences = Vec::new();
    let mut sentence = Sentence::default();
    let mut n_lines = 0;
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => Error::invalid_format(path, i + 1, e.to_string()),
            _ => Error::Io(e),
        })?;
        n_lines += 1;
        let fields: Vec<&str> = line
            .split(|c: char| c == '\t' || c == ' ')
            .filter(|s| !s.is_empty())
            .collect();
        if fields.is_empty() {
            if !sentence.is_empty() {
                sentences.push(std::mem::take(&mut sentence));
            }
            continue;
        }
        if fields.len() > MAX_FIELDS {
            return Err(Error::invalid_format(
                path,
                i + 1,
                format!("expected at most {MAX_FIELDS} fields, found {}", fields.len()),
            ));
        }
        sentence.push(Token::from_fields(&fields));
    }
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
    log::info!(
        "{}: {} lines, {} sentences, {} tokens",
        path.display(),
        n_lines,
        sentences.len(),
        sentences.iter().map(Sentence::len).sum::<usize>()
    );
    Ok(sentences)
}

/// Writes one `word<TAB>predicted` line per token and a blank line after
/// each sentence.
pub fn write_sentences<W: Write>(mut w: W, sentences: &[Sentence]) -> Result<()> {
    for sentence in sentences {
        for token in sentence.iter() {
            writeln!(w, "{}\t{}", token.literal(), token.predicted().unwrap_or_default())?;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "The\tDT\tB-NP\nDog\tNN\tI-NP\nbarks\tVBZ\tO\n\n\nA\tDT\tB-NP\ncat\tNN\tI-NP\n";

    #[test]
    fn read_sentences_split_on_blank_lines() {
        let corpus = Corpus::from_reader(TEXT.as_bytes(), "text").unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.total_tokens(), 5);
        assert_eq!(corpus.max_length(), 3);
        let first = &corpus.sentences()[0];
        assert_eq!(first.tokens()[1].literal(), "Dog");
        assert_eq!(first.tokens()[1].tag(), Some("NN"));
        assert_eq!(first.tokens()[1].chunk(), Some("I-NP"));
        assert_eq!(first.tokens()[1].index(), 1);
        assert_eq!(first.tokens()[1].predicted(), None);
    }

    #[test]
    fn vocabulary_is_case_insensitive() {
        let corpus = Corpus::from_reader(TEXT.as_bytes(), "text").unwrap();
        assert!(corpus.contains_word("dog"));
        assert!(corpus.contains_word("DOG"));
        assert!(corpus.contains_word("the"));
        assert!(!corpus.contains_word("bird"));
        assert!(!corpus.contains_word("   "));
        assert_eq!(corpus.vocabulary_size(), 5);
    }

    #[test]
    fn unlabeled_tokens() {
        let corpus = Corpus::from_reader("hello\nworld\n".as_bytes(), "text").unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.sentences()[0].tokens()[0].tag(), None);
    }

    #[test]
    fn capital_follows_the_literal() {
        let corpus = Corpus::from_reader("London\tNNP\nbridge\tNN\n".as_bytes(), "text").unwrap();
        let tokens = corpus.sentences()[0].tokens();
        assert_eq!(tokens[0].literal(), "London");
        assert!(tokens[0].starts_with_capital());
        assert!(!tokens[1].starts_with_capital());
    }

    #[test]
    fn too_many_fields() {
        let text = "a\tb\tc\td\te\tf\n";
        match Corpus::from_reader(text.as_bytes(), "bad.pos") {
            Err(Error::InvalidFormat { line, path, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(path, PathBuf::from("bad.pos"));
            }
            r => panic!("unexpected result: {r:?}"),
        }
    }

    #[test]
    fn invalid_utf8() {
        let bytes: &[u8] = b"The\tDT\n\xff\xfe\tNN\n";
        match Corpus::from_reader(bytes, "bad.pos") {
            Err(Error::InvalidFormat { line, path, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(path, PathBuf::from("bad.pos"));
            }
            r => panic!("unexpected result: {r:?}"),
        }
    }

    #[test]
    fn directories_are_read_in_name_order() {
        let root = std::env::temp_dir().join(format!("tagsuite-corpus-{}", std::process::id()));
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("b.pos"), "second\tNN\n").unwrap();
        fs::write(root.join("sub").join("c.pos"), "third\tNN\n").unwrap();
        fs::write(root.join("a.pos"), "first\tNN\n").unwrap();

        let corpus = Corpus::from_path(&root);
        fs::remove_dir_all(&root).unwrap();
        let corpus = corpus.unwrap();
        let words: Vec<&str> = corpus
            .sentences()
            .iter()
            .map(|s| s.tokens()[0].literal())
            .collect();
        assert_eq!(words, vec!["first", "second", "third"]);
    }

    #[test]
    fn missing_path() {
        assert!(matches!(
            Corpus::from_path("does/not/exist.pos"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn concat_rebuilds_vocabulary() {
        let a = Corpus::from_reader("one\tCD\n".as_bytes(), "a").unwrap();
        let b = Corpus::from_reader("Two\tCD\n\nthree\tCD\n".as_bytes(), "b").unwrap();
        let c = Corpus::concat([a, b]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.vocabulary_size(), 3);
        assert!(c.contains_word("two"));
    }

    #[test]
    fn write_predictions() {
        let mut sentence: Sentence = [Token::new("Hi"), Token::new("there")].into_iter().collect();
        sentence.tokens_mut()[0].set_predicted("UH");
        let mut out = Vec::new();
        write_sentences(&mut out, &[sentence]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hi\tUH\nthere\t\n\n");
    }
}
