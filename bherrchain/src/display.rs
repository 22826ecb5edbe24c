// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

// Renders the whole chain, `message: cause` followed by the trace of this link.
impl std::fmt::Display for crate::ErrorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = &self.node;
        match &node.cause {
            Some(cause) if !node.message.is_empty() => {
                write!(f, "{}: {}{}", node.message, cause, node.trace)
            }
            Some(cause) => write!(f, "{}{}", cause, node.trace),
            None => write!(f, "{}{}", node.message, node.trace),
        }
    }
}

// Goes through the whole error chain and writes every link as a JSON object.
impl std::fmt::Debug for crate::ErrorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = &self.node;
        let mut separator = "";

        write!(f, "{{")?;

        if !node.message.is_empty() {
            write!(f, "\"message\":{}", json_escape(&node.message))?;
            separator = ",";
        }

        if !node.trace.is_empty() {
            write!(f, "{separator}\"trace\":{}", json_escape(&node.trace))?;
            separator = ",";
        }

        if let Some(cause) = &node.cause {
            write!(f, "{separator}\"cause\":")?;

            // Known links use their own Debug, anything else goes through the foreign helper
            match cause.downcast_ref::<crate::ErrorChain>() {
                Some(link) => write!(f, "{:?}", link)?,
                None => debug_foreign_error(cause.as_ref(), f)?,
            }
        }

        write!(f, "}}")
    }
}

fn debug_foreign_error(
    error: &(dyn std::error::Error + 'static),
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    write!(f, "{{")?;

    let error_esc = json_escape(&format!(r"{:?}", error));
    write!(f, "\"error\":{}", error_esc)?;

    if let Some(source) = error.source() {
        write!(f, ",\"source\":")?;

        match source.downcast_ref::<crate::ErrorChain>() {
            Some(link) => write!(f, "{:?}", link)?,
            None => debug_foreign_error(source, f)?,
        }
    }

    write!(f, "}}")
}

fn json_escape(value: &str) -> String {
    serde_json::json!(value).to_string()
}
