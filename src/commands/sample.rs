use anyhow::Result;
use query_annotator::sample::sample_record;

use crate::cli::SampleArgs;
use crate::util::emit_json;

pub fn run(args: SampleArgs) -> Result<()> {
    emit_json(args.out.as_deref(), &sample_record())?;
    if let Some(out) = &args.out {
        tracing::info!(path = %out.display(), "wrote sample record");
    }
    Ok(())
}
