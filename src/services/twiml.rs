use std::fmt::Write;

use crate::models::{Gather, NextAction, StepDescriptor};

pub const CONTENT_TYPE: &str = "text/xml";

/// Renders a step as a TwiML document: top-level prompts, then either one
/// `<Gather>`, one `<Redirect>`, or `<Hangup/>`.
pub fn render(step: &StepDescriptor) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Response>\n");

    for line in &step.prompts {
        say(&mut xml, "  ", line);
    }

    match &step.next {
        NextAction::Collect(gather) => render_gather(&mut xml, gather),
        NextAction::Redirect(target) => {
            debug_assert!(!target.is_empty(), "redirect without a target");
            let _ = writeln!(
                xml,
                "  <Redirect method=\"POST\">{}</Redirect>",
                escape_xml(target)
            );
        }
        NextAction::Hangup => xml.push_str("  <Hangup/>\n"),
    }

    xml.push_str("</Response>\n");
    xml
}

fn render_gather(xml: &mut String, gather: &Gather) {
    debug_assert!(!gather.action.is_empty(), "gather without an action");

    let _ = write!(
        xml,
        "  <Gather input=\"{}\" timeout=\"{}\"",
        gather.mode.as_str(),
        gather.timeout_secs
    );
    if let Some(n) = gather.num_digits {
        let _ = write!(xml, " numDigits=\"{n}\"");
    }
    let _ = writeln!(
        xml,
        " action=\"{}\" method=\"POST\" actionOnEmptyResult=\"true\">",
        escape_xml(&gather.action)
    );
    for line in &gather.prompts {
        say(xml, "    ", line);
    }
    xml.push_str("  </Gather>\n");
}

fn say(xml: &mut String, indent: &str, line: &str) {
    let _ = writeln!(xml, "{indent}<Say>{}</Say>", escape_xml(line));
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
