use anyhow::Result;
use phedex::{Client, calc_checksum, init_logging};

fn main() -> Result<()> {
    // Usage: file_replicas <dataset> [local-file...]
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let dataset = args
        .next()
        .unwrap_or_else(|| "/MinimumBias/Run2011A-v1/RAW".to_string());

    let client = Client::new()?;
    let doc = client.file_replicas(&dataset)?;
    for file in doc.elements_by_tag_name("file") {
        let nodes: Vec<&str> = file
            .elements_by_tag_name("replica")
            .iter()
            .filter_map(|r| r.attribute("node"))
            .collect();
        println!(
            "{} {} [{}]",
            file.attribute("name").unwrap_or("?"),
            file.attribute("checksum").unwrap_or("-"),
            nodes.join(", ")
        );
    }

    for path in args {
        let sum = calc_checksum(&path);
        if sum.is_empty() {
            println!("{path}: checksum unavailable");
        } else {
            println!("{path}: adler32:{sum}");
        }
    }
    Ok(())
}
