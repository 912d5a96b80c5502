//! Batch build over a directory tree
//!
//! Every `<dir>/<stem>.html` below the input directory becomes a component package at
//! `<out>/<dir>/<stem>/`, holding `<stem>.templ` and `<stem>.go`. The sibling `<stem>.head` file
//! is required; its lines end up verbatim in the head array of the `.go` file.
//!
//! Documents are converted on the blocking pool, one task each. The first failure aborts the
//! tasks that have not finished yet and is returned as the result of the whole build.

use crate::config::Ssr2TemplConfig;
use crate::error::Error;
use crate::formats::{package_name, ComponentFrame, Declarations};
use crate::pipeline::Converter;
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: Ssr2TemplConfig,
}

/// Files written for one source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltDocument {
    pub source: PathBuf,
    pub template: PathBuf,
    pub declarations: PathBuf,
}

/// All files below `input_dir` with the given extension, sorted.
///
/// Ignore files and hidden-file rules do not apply: every matching document is built.
pub fn discover(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Error> {
    let mut sources = Vec::new();
    for entry in WalkBuilder::new(input_dir).standard_filters(false).build() {
        let entry = entry?;
        let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
        if is_file && entry.path().extension().is_some_and(|ext| ext == extension) {
            sources.push(entry.into_path());
        }
    }
    sources.sort();
    Ok(sources)
}

/// Convert every document below the input directory.
pub async fn build(options: BuildOptions) -> Result<Vec<BuiltDocument>, Error> {
    let sources = discover(&options.input_dir, &options.config.build.source_extension)?;
    info!(
        documents = sources.len(),
        input = %options.input_dir.display(),
        "starting build"
    );

    let options = Arc::new(options);
    let mut tasks = JoinSet::new();
    for source in sources {
        let options = Arc::clone(&options);
        tasks.spawn_blocking(move || build_document(&options, &source));
    }

    let mut built = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let result = joined
            .map_err(|e| Error::Task(e.to_string()))
            .and_then(|result| result);
        match result {
            Ok(document) => built.push(document),
            Err(err) => {
                tasks.abort_all();
                return Err(err);
            }
        }
    }

    built.sort_by(|a, b| a.source.cmp(&b.source));
    info!(documents = built.len(), "build finished");
    Ok(built)
}

/// Convert one document and write its package.
pub fn build_document(options: &BuildOptions, source: &Path) -> Result<BuiltDocument, Error> {
    let relative = source.strip_prefix(&options.input_dir).unwrap_or(source);
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out_dir = options
        .output_dir
        .join(relative.parent().unwrap_or(Path::new("")))
        .join(&stem);

    let html = fs::read_to_string(source).map_err(|e| Error::io(source, e))?;
    let head_path = source.with_extension(&options.config.build.head_extension);
    let head: Vec<String> = fs::read_to_string(&head_path)
        .map_err(|e| Error::io(&head_path, e))?
        .lines()
        .map(str::to_string)
        .collect();

    let converter = Converter::from_config(&options.config.template);
    let conversion = converter
        .convert(&html)
        .map_err(|e| e.in_document(source))?;
    debug!(
        source = %relative.display(),
        properties = conversion.schema.properties.len(),
        "converted document"
    );

    let package = package_name(&stem);
    let templ = ComponentFrame::new(
        &package,
        &package,
        &options.config.component,
        converter.indent(),
    )
    .render(&conversion.template);
    let go = Declarations::new(&package, &package)
        .with_head(&head)
        .render(&conversion.schema);

    fs::create_dir_all(&out_dir).map_err(|e| Error::io(&out_dir, e))?;
    let template = out_dir.join(format!("{stem}.templ"));
    let declarations = out_dir.join(format!("{stem}.go"));
    fs::write(&template, templ).map_err(|e| Error::io(&template, e))?;
    fs::write(&declarations, go).map_err(|e| Error::io(&declarations, e))?;

    info!(source = %relative.display(), output = %out_dir.display(), "wrote component");
    Ok(BuiltDocument {
        source: source.to_path_buf(),
        template,
        declarations,
    })
}
