pub mod assistant;
pub mod certificate;
pub mod domain;
pub mod generation;
pub mod importer;
pub mod keywords;
pub mod ports;
pub mod session;

pub use assistant::ChatAssistant;
pub use domain::{
    Certificate, ChatMessage, ChatReply, ChatRole, Course, OptionDraft, QuestionDraft, Quiz,
    QuizDraft, QuizSummary,
};
pub use ports::{
    ChatTransport, DatabaseService, GenerationError, GenerativeModelService, PortError,
    PortResult,
};
pub use session::ChatSession;
