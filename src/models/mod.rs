pub mod document;
pub mod exam;
pub mod loaders;
pub mod suggestion;
pub mod template;

pub use document::{DocumentText, UploadedDocument};
pub use exam::{AnswerOption, Comment, Exam, OptionLabel, Question};
pub use loaders::{load_all_documents, load_template};
pub use suggestion::SuggestedTemplate;
pub use template::Template;
