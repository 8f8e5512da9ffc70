use crate::EditorError;
use influence_core::DocumentSnapshot;
use std::path::Path;

/// Read and validate a document. Accepts the flat, bare and legacy wrapped forms.
pub fn read_document(path: &Path) -> Result<DocumentSnapshot, EditorError> {
    tracing::info!("Reading document {:?}", path);
    let content = std::fs::read_to_string(path)?;
    Ok(DocumentSnapshot::from_json_str(&content)?)
}

/// Write a document in the flat format, creating parent directories as needed.
pub fn write_document(path: &Path, document: &DocumentSnapshot) -> Result<(), EditorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let json = document.to_json_pretty()?;
    std::fs::write(path, json)?;
    tracing::info!(
        "Wrote {} nodes and {} edges to {:?}",
        document.graph.nodes.len(),
        document.graph.edges.len(),
        path
    );
    Ok(())
}
