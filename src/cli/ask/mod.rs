//! Ask command - one-shot synchronous answer

use std::path::Path;
use std::sync::Arc;

use clap::Args;

use crate::domain::VectorIndex;
use crate::infrastructure::index::ActiveIndex;
use crate::infrastructure::services::AnswerServiceTrait;

#[derive(Args, Clone, Debug)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,
}

/// Print the answer on stdout. Rejected questions and a corrupt index exit
/// with an error.
pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let snapshot = crate::load_index(Path::new(&config.index.dir)).await?;
    let index: Arc<dyn VectorIndex> = Arc::new(ActiveIndex::new(snapshot));
    let service = crate::create_answer_service(&config, index)?;

    let result = service.answer(&args.question).await?;

    println!("{}", result.text);
    Ok(())
}
