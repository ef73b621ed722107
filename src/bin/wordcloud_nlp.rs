use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    wordcloud_nlp::example_apps::run_wordcloud(std::env::args().skip(1))
}
