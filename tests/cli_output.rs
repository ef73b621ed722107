use std::fs;

use tempfile::tempdir;
use wordcloud_nlp::example_apps::run_wordcloud;

fn args(values: &[String]) -> impl Iterator<Item = String> {
    values.to_vec().into_iter()
}

#[test]
fn writes_csv_and_html_from_a_cached_layout_script() {
    let temp = tempdir().unwrap();
    let inputs = temp.path().join("inputs");
    fs::create_dir_all(inputs.join("nested")).unwrap();
    fs::write(inputs.join("a.txt"), "Café com leite\ncafé quente").unwrap();
    fs::write(inputs.join("b.txt"), "leite frio").unwrap();
    fs::write(inputs.join("nested/ignored.txt"), "never read").unwrap();

    let assets = temp.path().join("assets");
    fs::create_dir_all(&assets).unwrap();
    fs::write(assets.join("d3.layout.cloud.js"), "/* cached layout */").unwrap();

    let output = temp.path().join("out/cloud");
    run_wordcloud(args(&[
        inputs.display().to_string(),
        "-o".into(),
        output.display().to_string(),
        "-w".into(),
        "1".into(),
        "--no-stopwords".into(),
        "--asset-dir".into(),
        assets.display().to_string(),
    ]))
    .unwrap();

    let csv = fs::read_to_string(temp.path().join("out/cloud.csv")).unwrap();
    assert_eq!(
        csv,
        "term,count\ncafe,2\nleite,2\ncom,1\nquente,1\nfrio,1\n"
    );

    let html = fs::read_to_string(temp.path().join("out/cloud.html")).unwrap();
    assert!(html.contains("/* cached layout */"));
    assert!(html.contains("\"text\": \"cafe\""));
    assert!(!html.contains("\"text\": \"leite\""));
    assert!(!html.contains("never read"));
}

#[test]
fn csv_survives_when_rendering_fails() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("posts.txt");
    fs::write(&input, "hello world").unwrap();
    // A file where the cache folder should be makes the asset unwritable.
    let blocked = temp.path().join("blocked");
    fs::write(&blocked, "").unwrap();

    let output = temp.path().join("posts");
    let result = run_wordcloud(args(&[
        input.display().to_string(),
        "-o".into(),
        output.display().to_string(),
        "--asset-dir".into(),
        blocked.join("cache").display().to_string(),
    ]));

    assert!(result.is_err());
    let csv = fs::read_to_string(temp.path().join("posts.csv")).unwrap();
    assert!(csv.contains("hello,1"));
    assert!(!temp.path().join("posts.html").exists());
}

#[test]
fn zero_width_ngrams_fail_before_writing() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("posts.txt");
    fs::write(&input, "hello world").unwrap();
    let output = temp.path().join("posts");
    let result = run_wordcloud(args(&[
        input.display().to_string(),
        "-o".into(),
        output.display().to_string(),
        "-n".into(),
        "0".into(),
    ]));
    assert!(result.is_err());
    assert!(!temp.path().join("posts.csv").exists());
}
