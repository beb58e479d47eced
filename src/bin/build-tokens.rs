use anyhow::Context;

fn main() -> anyhow::Result<()> {
    tokencss::logging::init();

    let config = tokencss::BuildConfig::load();
    let summary = tokencss::build_primitive_tokens(&config).with_context(|| {
        format!(
            "failed to build primitive tokens from {}",
            config.input.display()
        )
    })?;
    print!("{summary}");
    Ok(())
}
