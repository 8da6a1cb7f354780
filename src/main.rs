use schemalab::Playground;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> AppResult<()> {
    let data = Playground::new()
        .with_title("schemalab playground")
        .run()?;

    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
