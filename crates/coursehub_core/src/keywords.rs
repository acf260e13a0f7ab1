//! crates/coursehub_core/src/keywords.rs
//!
//! Keyword matching shared by the canned fallback answers and the follow-up
//! suggestions shown under each chat reply.

/// An ordered table of `(keywords, value)` rows. Matching is a case-insensitive
/// substring test and the first matching row wins.
#[derive(Debug, Clone, Copy)]
pub struct KeywordTable<'a, T> {
    rows: &'a [(&'a [&'a str], T)],
}

impl<'a, T> KeywordTable<'a, T> {
    /// Keywords must be lower-case.
    pub const fn new(rows: &'a [(&'a [&'a str], T)]) -> Self {
        Self { rows }
    }

    pub fn lookup(&self, text: &str) -> Option<&'a T> {
        let haystack = text.to_lowercase();
        self.rows
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| haystack.contains(keyword)))
            .map(|(_, value)| value)
    }
}

//=========================================================================================
// Fallback Answers
//=========================================================================================

const FALLBACK_ROWS: &[(&[&str], &str)] = &[
    (
        &["javascript"],
        "JavaScript is the language of the web. Start with variables (let and const), functions and arrays, then move on to the DOM, events and asynchronous code with promises and async/await. Small interactive projects are the fastest way to make it stick.",
    ),
    (
        &["react"],
        "React builds user interfaces from components. Learn JSX, props and state first, then hooks such as useState and useEffect. Think of your UI as a function of state and keep components small and focused.",
    ),
    (
        &["css"],
        "CSS controls how your pages look. Get comfortable with selectors, the box model and specificity, then learn Flexbox and Grid for layout. Media queries will help you make designs responsive.",
    ),
    (
        &["html"],
        "HTML gives a page its structure. Use semantic elements like header, nav, main, article and footer, write accessible forms with labels, and validate your markup as you go.",
    ),
    (
        &["python"],
        "Python is known for readable syntax. Practice with variables, lists, dictionaries and functions, then explore modules and object-oriented programming. It is a great fit for scripting, data analysis and web backends.",
    ),
    (
        &["quiz", "test", "exam"],
        "To prepare for a quiz, review the lesson summaries, redo the practice questions and focus on the topics you found hardest. Read each question carefully and manage your time during the attempt.",
    ),
    (
        &["study", "learn"],
        "Effective studying works best in short focused sessions with regular breaks. Try active recall and spaced repetition, build small projects with what you learn and explain concepts in your own words.",
    ),
];

/// Canned educational answers used when the model cannot be reached.
pub const FALLBACK_ANSWERS: KeywordTable<'static, &'static str> =
    KeywordTable::new(FALLBACK_ROWS);

/// Picks a canned answer for `message`. Never fails and never performs I/O.
pub fn fallback_response(message: &str) -> String {
    match FALLBACK_ANSWERS.lookup(message) {
        Some(answer) => (*answer).to_string(),
        None => format!(
            "Thanks for your question: \"{}\". I can't reach the AI tutor right now, but I can still help you get started. Break the topic into smaller parts, check the related lessons in your course and try a short practice exercise. Feel free to ask again in a moment for a more detailed answer.",
            message
        ),
    }
}

//=========================================================================================
// Follow-up Suggestions
//=========================================================================================

const SUGGESTION_ROWS: &[(&[&str], &[&str])] = &[
    (
        &["javascript"],
        &[
            "Explain JavaScript closures",
            "How does async/await work?",
            "What is the difference between let and const?",
        ],
    ),
    (
        &["react"],
        &[
            "What are React hooks?",
            "How do props differ from state?",
            "When should I use useEffect?",
        ],
    ),
    (
        &["css"],
        &[
            "Explain Flexbox vs Grid",
            "How does CSS specificity work?",
            "How do I make a layout responsive?",
        ],
    ),
    (
        &["html"],
        &[
            "What are semantic HTML elements?",
            "How do I build an accessible form?",
            "What goes in the head element?",
        ],
    ),
    (
        &["python"],
        &[
            "Explain Python list comprehensions",
            "How do Python classes work?",
            "What are Python decorators?",
        ],
    ),
    (
        &["quiz", "test", "exam"],
        &[
            "Give me a practice question",
            "How should I review before a quiz?",
            "What topics should I focus on?",
        ],
    ),
    (
        &["study", "learn"],
        &[
            "Create a study plan for me",
            "What is spaced repetition?",
            "How can I stay motivated?",
        ],
    ),
];

const SUGGESTIONS: KeywordTable<'static, &'static [&'static str]> =
    KeywordTable::new(SUGGESTION_ROWS);

const DEFAULT_SUGGESTIONS: &[&str] = &[
    "Explain this concept with an example",
    "Give me a practice question",
    "Suggest what to learn next",
];

/// Follow-up prompts offered after the bot answers `message`.
pub fn suggestions_for(message: &str) -> Vec<String> {
    SUGGESTIONS
        .lookup(message)
        .copied()
        .unwrap_or(DEFAULT_SUGGESTIONS)
        .iter()
        .map(|suggestion| suggestion.to_string())
        .collect()
}
