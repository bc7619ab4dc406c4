use clarifai_rs::{top_tags, ClarifaiClient, ClientConfig};
use tracing_subscriber::EnvFilter;

const GENERAL_MODEL: &str = "aaa03c23b3724a16a56b629203edc62c";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clarifai_rs=debug")),
        )
        .init();

    let urls: Vec<String> = std::env::args().skip(1).collect();
    if urls.is_empty() {
        eprintln!("Usage: CLARIFAI_API_KEY=... predict_urls <image_url>...");
        std::process::exit(1);
    }

    let client = ClarifaiClient::with_config(ClientConfig::from_env()?);

    println!("Predicting {} image(s) with the general model...", urls.len());
    let response = client.predict_by_urls(&urls, GENERAL_MODEL).await?;

    for output in &response.outputs {
        let source = output
            .input
            .as_ref()
            .and_then(|i| i.data.as_ref())
            .and_then(|d| d.image.as_ref())
            .and_then(|img| img.url.as_deref())
            .unwrap_or("<inline>");
        println!("{}:", source);
        for concept in output.concepts() {
            println!("  - {} ({:.3})", concept.name, concept.value.unwrap_or_default());
        }
    }

    match top_tags(&response, 5) {
        Ok(tags) => println!("Top five: {}", tags.join(", ")),
        Err(e) => println!("No top five: {}", e),
    }

    Ok(())
}
