use std::io::Read;
use std::path::Path;
use std::time::Instant;

use csv::{ReaderBuilder, StringRecord};
use rand::seq::index;
use rand::Rng;
use thiserror::Error;

pub const OPTION_COUNT: usize = 4;

const QUESTION_COLUMN: &str = "Question";
const OPTION_COLUMNS: [&str; OPTION_COUNT] = ["Option1", "Option2", "Option3", "Option4"];
const INDEX_COLUMN: &str = "CorrectAnswerIndex";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open question source: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not read question source: {0}")]
    Csv(#[from] csv::Error),
    #[error("header is missing the {column} column")]
    MissingColumn { column: &'static str },
    #[error("row {row} has no value for {column}")]
    MissingField { row: usize, column: &'static str },
    #[error("row {row} has a non-integer answer index {value:?}")]
    InvalidIndex { row: usize, value: String },
    #[error("row {row} has answer index {value}, expected 0 to 3")]
    IndexOutOfRange { row: usize, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: usize,
}

impl Question {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}

/// Column positions resolved from the header row.
struct Columns {
    question: usize,
    options: [usize; OPTION_COUNT],
    index: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(LoadError::MissingColumn { column })
        };
        Ok(Self {
            question: find(QUESTION_COLUMN)?,
            options: [
                find(OPTION_COLUMNS[0])?,
                find(OPTION_COLUMNS[1])?,
                find(OPTION_COLUMNS[2])?,
                find(OPTION_COLUMNS[3])?,
            ],
            index: find(INDEX_COLUMN)?,
        })
    }
}

fn field(
    record: &StringRecord,
    position: usize,
    row: usize,
    column: &'static str,
) -> Result<String, LoadError> {
    match record.get(position) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(LoadError::MissingField { row, column }),
    }
}

/// Any signed run of digits is an integer; one outside 0..4 is out of range
/// however large it is.
fn parse_index(raw: &str, row: usize) -> Result<usize, LoadError> {
    let digits = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LoadError::InvalidIndex {
            row,
            value: raw.to_string(),
        });
    }
    match raw.parse::<usize>() {
        Ok(index) if index < OPTION_COUNT => Ok(index),
        _ => Err(LoadError::IndexOutOfRange {
            row,
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    #[cfg(test)]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn load_from_csv(path: &Path) -> Result<Self, LoadError> {
        log::info!("Loading questions from: {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::load_from_reader(file)
    }

    /// Parses a header-led CSV source. Any bad row aborts the whole load.
    pub fn load_from_reader<R: Read>(source: R) -> Result<Self, LoadError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let columns = Columns::resolve(reader.headers()?)?;
        let mut questions = Vec::new();

        for (i, result) in reader.records().enumerate() {
            let record = result?;
            let row = i + 1;

            let text = field(&record, columns.question, row, QUESTION_COLUMN)?;
            let options = [
                field(&record, columns.options[0], row, OPTION_COLUMNS[0])?,
                field(&record, columns.options[1], row, OPTION_COLUMNS[1])?,
                field(&record, columns.options[2], row, OPTION_COLUMNS[2])?,
                field(&record, columns.options[3], row, OPTION_COLUMNS[3])?,
            ];
            let raw_index = field(&record, columns.index, row, INDEX_COLUMN)?;
            let index = parse_index(&raw_index, row)?;

            log::trace!("Row {}: {:?}", row, text);
            questions.push(Question {
                text,
                options,
                correct_index: index,
            });
        }

        log::info!("Loaded {} questions", questions.len());
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[cfg(test)]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Picks up to `count` distinct questions uniformly without replacement.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Question> {
        let amount = count.min(self.questions.len());
        index::sample(rng, self.questions.len(), amount)
            .into_iter()
            .map(|i| self.questions[i].clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// Shown after a submit until `until`; the question cannot be answered again meanwhile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub verdict: Verdict,
    pub correct_option: String,
    pub until: Instant,
}

impl Feedback {
    pub fn message(&self) -> String {
        match self.verdict {
            Verdict::Correct => "Correct!".to_string(),
            Verdict::Incorrect => {
                format!("Incorrect. The correct answer was: {}", self.correct_option)
            }
        }
    }
}

#[derive(Debug)]
pub struct QuizSession {
    selected: Vec<Question>,
    current_index: usize,
    answers: Vec<Option<usize>>,
    score: usize,
    feedback: Option<Feedback>,
}

impl QuizSession {
    pub fn new(selected: Vec<Question>) -> Self {
        let answers = vec![None; selected.len()];
        Self {
            selected,
            current_index: 0,
            answers,
            score: 0,
            feedback: None,
        }
    }

    #[cfg(test)]
    pub fn selected(&self) -> &[Question] {
        &self.selected
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.selected.get(self.current_index)
    }

    pub fn current_answer(&self) -> Option<usize> {
        self.answers.get(self.current_index).copied().flatten()
    }

    #[cfg(test)]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.selected.len()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.feedback.is_none() && self.current_answer().is_some()
    }

    /// Records `option` for the current question, replacing any earlier pick.
    /// Ignored while feedback is showing or when `option` is not on the card.
    pub fn select(&mut self, option: usize) -> bool {
        if self.feedback.is_some() || option >= OPTION_COUNT {
            return false;
        }
        match self.answers.get_mut(self.current_index) {
            Some(slot) => {
                *slot = Some(option);
                true
            }
            None => false,
        }
    }

    /// Scores the current answer and opens the feedback window.
    /// Returns `None` without touching anything if there is nothing to submit.
    pub fn submit(&mut self, until: Instant) -> Option<Verdict> {
        if self.feedback.is_some() {
            return None;
        }
        let answer = self.current_answer()?;
        let question = self.current_question()?;
        let verdict = if answer == question.correct_index {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };
        let correct_option = question.correct_option().to_string();
        if verdict == Verdict::Correct {
            self.score += 1;
        }
        self.feedback = Some(Feedback {
            verdict,
            correct_option,
            until,
        });
        Some(verdict)
    }

    /// Whether the open feedback window has run out at `now`.
    pub fn feedback_elapsed(&self, now: Instant) -> bool {
        self.feedback.as_ref().is_some_and(|f| now >= f.until)
    }

    /// Closes the feedback window. Returns false when there is no next question.
    pub fn advance(&mut self) -> bool {
        self.feedback = None;
        if self.current_index + 1 < self.selected.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary::new(self.score, self.selected.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Perfect,
    Good,
    KeepPracticing,
}

impl Tier {
    pub fn from_percentage(percentage: f32) -> Self {
        if percentage >= 100.0 {
            Tier::Perfect
        } else if percentage >= 70.0 {
            Tier::Good
        } else {
            Tier::KeepPracticing
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Tier::Perfect => "Excellent! You got all answers correct!",
            Tier::Good => "Good job! You did well.",
            Tier::KeepPracticing => "Keep practicing! You'll get better.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultSummary {
    pub score: usize,
    pub total: usize,
    pub percentage: f32,
    pub tier: Tier,
}

impl ResultSummary {
    /// An empty quiz scores 0/0 and lands in the lowest tier.
    pub fn new(score: usize, total: usize) -> Self {
        if total == 0 {
            return Self {
                score: 0,
                total: 0,
                percentage: 0.0,
                tier: Tier::KeepPracticing,
            };
        }
        let percentage = score as f32 * 100.0 / total as f32;
        Self {
            score,
            total,
            percentage,
            tier: Tier::from_percentage(percentage),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::time::Duration;

    const HEADER: &str = "Question,Option1,Option2,Option3,Option4,CorrectAnswerIndex\n";

    pub(crate) fn sample_bank(size: usize) -> QuestionBank {
        QuestionBank::new(
            (0..size)
                .map(|i| Question {
                    text: format!("Question {}", i),
                    options: [
                        format!("{}a", i),
                        format!("{}b", i),
                        format!("{}c", i),
                        format!("{}d", i),
                    ],
                    correct_index: i % OPTION_COUNT,
                })
                .collect(),
        )
    }

    fn load(body: &str) -> Result<QuestionBank, LoadError> {
        QuestionBank::load_from_reader(format!("{}{}", HEADER, body).as_bytes())
    }

    #[test]
    fn loads_well_formed_rows() {
        let bank = load(
            "What is 2+2?,3,4,5,6,1\n\
             \"Capital of France, the country?\",Rome,Madrid,Paris,Berlin,2\n",
        )
        .unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.questions()[0].correct_option(), "4");
        assert_eq!(bank.questions()[1].text, "Capital of France, the country?");
        assert_eq!(bank.questions()[1].correct_index, 2);
        for question in bank.questions() {
            assert_eq!(question.options.len(), OPTION_COUNT);
            assert!(question.correct_index < OPTION_COUNT);
        }
    }

    #[test]
    fn bundled_bank_loads() {
        let bank = QuestionBank::load_from_csv(Path::new("assets/questions.csv")).unwrap();
        assert_eq!(bank.len(), 10);
    }

    #[test]
    fn columns_may_come_in_any_order() {
        let source = "CorrectAnswerIndex,Option4,Option3,Option2,Option1,Question\n3,d,c,b,a,Pick d\n";
        let bank = QuestionBank::load_from_reader(source.as_bytes()).unwrap();
        assert_eq!(bank.questions()[0].options[0], "a");
        assert_eq!(bank.questions()[0].correct_option(), "d");
    }

    #[test]
    fn header_only_source_is_an_empty_bank() {
        let bank = load("").unwrap();
        assert!(bank.is_empty());
    }

    #[test]
    fn non_integer_index_fails_the_load() {
        let err = load("Ok,a,b,c,d,0\nBad,a,b,c,d,two\n").unwrap_err();
        assert!(matches!(err, LoadError::InvalidIndex { row: 2, ref value } if value == "two"));
    }

    #[test]
    fn out_of_range_index_fails_the_load() {
        for raw in ["4", "-1", "99999999999999999999999999"] {
            let err = load(&format!("Bad,a,b,c,d,{}\n", raw)).unwrap_err();
            assert!(
                matches!(err, LoadError::IndexOutOfRange { row: 1, ref value } if value == raw),
                "{} gave {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn signs_and_stray_characters_are_not_integers() {
        let bank = load("Plus,a,b,c,d,+2\n").unwrap();
        assert_eq!(bank.questions()[0].correct_index, 2);
        for raw in ["1.0", "1e2", "-", "0x1"] {
            let err = load(&format!("Bad,a,b,c,d,{}\n", raw)).unwrap_err();
            assert!(matches!(err, LoadError::InvalidIndex { row: 1, .. }), "{}", raw);
        }
    }

    #[test]
    fn missing_option_fails_the_load() {
        let err = load("Short,a,b,c\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingField { row: 1, .. }));
        let err = load("Blank,a,b,,d,0\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField { row: 1, column: "Option3" }
        ));
    }

    #[test]
    fn missing_header_column_fails_the_load() {
        let source = "Question,Option1,Option2,Option3,Option4\nQ,a,b,c,d\n";
        let err = QuestionBank::load_from_reader(source.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { column: "CorrectAnswerIndex" }
        ));
    }

    #[test]
    fn sample_is_distinct_and_sized() {
        let bank = sample_bank(10);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = bank.sample(&mut rng, 5);
        assert_eq!(picked.len(), 5);
        let unique: HashSet<_> = picked.iter().map(|q| q.text.clone()).collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn small_bank_is_taken_whole() {
        let bank = sample_bank(2);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = bank.sample(&mut rng, 5);
        let unique: HashSet<_> = picked.iter().map(|q| q.text.clone()).collect();
        assert_eq!(picked.len(), 2);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn sampling_varies_between_draws() {
        let bank = sample_bank(10);
        let mut rng = StdRng::seed_from_u64(99);
        let draws: HashSet<Vec<String>> = (0..50)
            .map(|_| bank.sample(&mut rng, 5).into_iter().map(|q| q.text).collect())
            .collect();
        assert!(draws.len() > 1);
    }

    #[test]
    fn only_the_last_selection_is_scored() {
        let bank = sample_bank(1);
        let mut session = QuizSession::new(bank.questions().to_vec());
        let correct = session.selected()[0].correct_index;
        let wrong = (correct + 1) % OPTION_COUNT;

        assert!(session.select(wrong));
        assert!(session.select(correct));
        assert_eq!(session.submit(Instant::now()), Some(Verdict::Correct));
        assert_eq!(session.score(), 1);

        let mut session = QuizSession::new(bank.questions().to_vec());
        session.select(correct);
        session.select(wrong);
        assert_eq!(session.submit(Instant::now()), Some(Verdict::Incorrect));
        assert_eq!(session.score(), 0);
        assert_eq!(
            session.feedback().unwrap().message(),
            format!(
                "Incorrect. The correct answer was: {}",
                session.selected()[0].correct_option()
            )
        );
    }

    #[test]
    fn submit_without_selection_changes_nothing() {
        let mut session = QuizSession::new(sample_bank(3).questions().to_vec());
        assert_eq!(session.submit(Instant::now()), None);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert!(session.feedback().is_none());
    }

    #[test]
    fn feedback_window_blocks_resubmit_and_reselect() {
        let mut session = QuizSession::new(sample_bank(3).questions().to_vec());
        let now = Instant::now();
        let correct = session.selected()[0].correct_index;
        session.select(correct);
        session.submit(now + Duration::from_millis(1500));

        assert!(!session.select((correct + 1) % OPTION_COUNT));
        assert_eq!(session.submit(now), None);
        assert_eq!(session.score(), 1);
        assert!(!session.feedback_elapsed(now));
        assert!(session.feedback_elapsed(now + Duration::from_millis(1500)));
    }

    #[test]
    fn advance_stops_after_last_question() {
        let mut session = QuizSession::new(sample_bank(2).questions().to_vec());
        assert!(session.advance());
        assert_eq!(session.current_index(), 1);
        assert!(!session.advance());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn tiers_follow_percentage() {
        assert_eq!(ResultSummary::new(5, 5).tier, Tier::Perfect);
        assert_eq!(ResultSummary::new(4, 5).tier, Tier::Good);
        assert_eq!(ResultSummary::new(7, 10).tier, Tier::Good);
        let summary = ResultSummary::new(3, 5);
        assert_eq!(summary.percentage, 60.0);
        assert_eq!(summary.tier, Tier::KeepPracticing);
    }

    #[test]
    fn empty_quiz_scores_zero_of_zero() {
        let summary = QuizSession::new(Vec::new()).summary();
        assert_eq!((summary.score, summary.total), (0, 0));
        assert_eq!(summary.percentage, 0.0);
        assert_eq!(summary.tier, Tier::KeepPracticing);
    }
}
