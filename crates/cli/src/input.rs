//! Turns command-line arguments into a [`PipelineInput`] and a [`PipelineConfig`].

use std::path::Path;

use anyhow::{anyhow, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pipeline::{ModelId, PipelineConfig, PipelineInput};

use crate::args::Args;

/// Loads the TOML file when given, then applies the model override.
pub async fn load_config(
    path: Option<&Path>,
    model: Option<&str>,
) -> anyhow::Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => {
            let source = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            PipelineConfig::from_toml_str(&source)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    if let Some(model) = model.map(str::trim).filter(|m| !m.is_empty()) {
        let model = ModelId::new(model).ok_or_else(|| anyhow!("model must not be empty"))?;
        config = config.with_model(model);
    }

    config.validate()?;
    Ok(config)
}

pub async fn build_input(args: &Args) -> anyhow::Result<PipelineInput> {
    let mut input = PipelineInput::new(args.request.clone());

    if let Some(image) = &args.image {
        input = input.with_image(resolve_image(image).await?);
    }
    if let Some(path) = &args.current_code {
        let code = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read current code from {}", path.display()))?;
        input = input.with_current_code(code);
    }

    Ok(input)
}

/// URLs and data URIs pass through; anything else is read as a local file.
pub async fn resolve_image(image: &str) -> anyhow::Result<String> {
    let image = image.trim();
    if is_remote_or_inline(image) {
        return Ok(image.to_owned());
    }

    let path = Path::new(image);
    let mime = image_mime(path)
        .ok_or_else(|| anyhow!("unsupported image type for {}", path.display()))?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image {}", path.display()))?;
    Ok(data_uri(mime, &bytes))
}

fn is_remote_or_inline(image: &str) -> bool {
    ["http://", "https://", "data:"]
        .iter()
        .any(|scheme| image.starts_with(scheme))
}

fn image_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_extension_case_insensitively() {
        assert_eq!(image_mime(Path::new("shot.PNG")), Some("image/png"));
        assert_eq!(image_mime(Path::new("a/b/photo.jpeg")), Some("image/jpeg"));
        assert_eq!(image_mime(Path::new("mock.webp")), Some("image/webp"));
        assert_eq!(image_mime(Path::new("notes.txt")), None);
        assert_eq!(image_mime(Path::new("no_extension")), None);
    }

    #[test]
    fn data_uri_is_base64_encoded() {
        assert_eq!(data_uri("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[tokio::test]
    async fn urls_pass_through_untouched() {
        for url in [
            "https://example.com/shot.png",
            "http://localhost/x.jpg",
            "data:image/png;base64,AAA",
        ] {
            assert_eq!(resolve_image(url).await.unwrap(), url);
        }
    }

    #[tokio::test]
    async fn local_files_become_data_uris() {
        let path = std::env::temp_dir().join(format!("uiforge-input-{}.png", std::process::id()));
        tokio::fs::write(&path, b"hi").await.unwrap();

        let uri = resolve_image(path.to_str().unwrap()).await;
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(uri.unwrap(), "data:image/png;base64,aGk=");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let err = resolve_image("/definitely/not/here.png").await.unwrap_err();
        assert!(err.to_string().contains("failed to read image"));
    }

    #[tokio::test]
    async fn model_override_replaces_default() {
        let config = load_config(None, Some("meta-llama/Llama-3.2-11B-Vision-Instruct"))
            .await
            .unwrap();
        assert_eq!(config.model.as_str(), "meta-llama/Llama-3.2-11B-Vision-Instruct");

        let config = load_config(None, Some("  ")).await.unwrap();
        assert_eq!(config.model.as_str(), pipeline::DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn config_file_is_parsed_and_validated() {
        let dir = std::env::temp_dir();
        let good = dir.join(format!("uiforge-good-{}.toml", std::process::id()));
        let bad = dir.join(format!("uiforge-bad-{}.toml", std::process::id()));
        tokio::fs::write(&good, "[coder]\nmax_tokens = 6000\ntemperature = 0.1\n")
            .await
            .unwrap();
        tokio::fs::write(&bad, "[planner]\nmax_tokens = 10\ntemperature = 9.0\n")
            .await
            .unwrap();

        let loaded = load_config(Some(&good), None).await;
        let rejected = load_config(Some(&bad), None).await;
        tokio::fs::remove_file(&good).await.unwrap();
        tokio::fs::remove_file(&bad).await.unwrap();

        assert_eq!(loaded.unwrap().coder.max_tokens, 6000);
        assert!(rejected.is_err());
    }
}
