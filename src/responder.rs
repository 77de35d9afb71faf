/// Produces the assistant's reply to a query typed into the panel.
///
/// No language model is wired up yet; implementations plug in here.
pub trait Responder: Send {
    fn respond(&self, query: &str) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EchoResponder;

impl Responder for EchoResponder {
    fn respond(&self, query: &str) -> String {
        format!("Analyzing: {query}... (no assistant backend connected)")
    }
}
