use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use influence_core::{DocumentSnapshot, InfluenceGraph};
use influence_editor::{Editor, EditorSettings, ScriptedPrompter, read_document, write_document};
use influence_events::EventBus;
use influence_graph::Vec2;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the price/demand/supply demo diagram
    Demo {
        /// Output file
        out: PathBuf,
    },
    /// Print the nodes and edges of a document
    Inspect {
        /// Document to read
        file: PathBuf,
    },
    /// Rewrite a document (bare or legacy layout) in the canonical format
    Normalize {
        /// Document to read
        input: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    match args.command {
        Command::Demo { out } => {
            let document = demo_document();
            write_document(&out, &document)
                .with_context(|| format!("writing demo to {}", out.display()))?;
            println!(
                "Wrote {} factors and {} influences to {}",
                document.graph.nodes.len(),
                document.graph.edges.len(),
                out.display()
            );
        }
        Command::Inspect { file } => {
            let document =
                read_document(&file).with_context(|| format!("reading {}", file.display()))?;
            print!("{}", describe(document)?);
        }
        Command::Normalize { input, out } => {
            let document = normalize(&input)?;
            match out {
                Some(path) => {
                    write_document(&path, &document)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Normalized {} -> {}", input.display(), path.display());
                }
                None => println!("{}", document.to_json_pretty()?),
            }
        }
    }

    Ok(())
}

/// The three-factor market loop, built through the editor's command surface.
fn demo_document() -> DocumentSnapshot {
    demo_editor().save()
}

/// Editor holding the demo diagram. Nothing listens on its bus, so the events
/// from building it are drained here.
fn demo_editor() -> Editor<ScriptedPrompter> {
    let settings = EditorSettings {
        snap_enabled: false,
        ..Default::default()
    };
    let mut editor = Editor::new(settings, ScriptedPrompter::new(), EventBus::new());
    let factors = [
        ("Preis", 260.0, 220.0),
        ("Nachfrage", 520.0, 220.0),
        ("Angebot", 390.0, 380.0),
    ];
    let keys: Vec<_> = factors
        .iter()
        .filter_map(|&(label, x, y)| editor.create_node_at(Vec2::new(x, y), label))
        .collect();
    if let [price, demand, supply] = keys.as_slice() {
        editor.create_or_update_edge(price, demand, -0.8);
        editor.create_or_update_edge(demand, price, -0.4);
        editor.create_or_update_edge(supply, demand, -0.7);
        editor.create_or_update_edge(demand, supply, 0.6);
    }
    let events = editor.event_bus().drain();
    tracing::debug!("Built demo diagram ({} events discarded)", events.len());
    editor
}

fn describe(document: DocumentSnapshot) -> Result<String> {
    use std::fmt::Write;

    let view = document.view.unwrap_or_default();
    let graph = InfluenceGraph::from_snapshot(document.graph)?;
    let mut out = String::new();

    writeln!(
        out,
        "{} factors, {} influences, next key F{}",
        graph.node_count(),
        graph.edge_count(),
        graph.counter()
    )?;
    writeln!(
        out,
        "view: scale {} offset ({}, {})",
        view.scale, view.offset[0], view.offset[1]
    )?;
    for (key, node) in graph.nodes() {
        writeln!(out, "  {key:<6} {:<24} ({}, {})", node.label, node.x, node.y)?;
    }
    for edge in graph.edges() {
        let sign = if edge.weight >= 0.0 { '+' } else { '-' };
        writeln!(
            out,
            "  {} -> {} [{sign}] {}",
            edge.src, edge.dst, edge.weight
        )?;
    }
    let dangling = graph.dangling_edge_count();
    if dangling > 0 {
        writeln!(out, "{dangling} dangling edge(s)")?;
    }
    Ok(out)
}

/// Load through the model so the counter is reconstructed, then emit the
/// canonical flat layout.
fn normalize(input: &Path) -> Result<DocumentSnapshot> {
    tracing::debug!("Normalizing {:?}", input);
    let document =
        read_document(input).with_context(|| format!("reading {}", input.display()))?;
    let view = document.view.unwrap_or_default();
    let graph = InfluenceGraph::from_snapshot(document.graph)?;
    Ok(DocumentSnapshot {
        graph: graph.to_snapshot(),
        view: Some(view),
    })
}
