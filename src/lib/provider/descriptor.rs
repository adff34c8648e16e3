//! Read access to the raw project file, for the properties the IDE automation layer does
//! not expose

use std::collections::HashMap;

use roxmltree::{Document, Node};

use crate::domain::errors::ConversionError;

const PROJECT: &str = "Project";
const ITEM_DEFINITION_GROUP: &str = "ItemDefinitionGroup";
const ITEM_GROUP: &str = "ItemGroup";
const CL_COMPILE: &str = "ClCompile";
const SDL_CHECK: &str = "SDLCheck";
const CONDITION: &str = "Condition";
const INCLUDE: &str = "Include";

/// The queryable view of a `.vcxproj` document.
///
/// The document is parsed once and the values of interest are copied out of it, so the view
/// does not borrow the source text. Element names are matched by their local name, so the
/// `msbuild` default namespace makes no difference
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawDescriptor {
    /// `ItemDefinitionGroup/ClCompile/SDLCheck` texts, keyed by the group condition
    project_sdl_checks: HashMap<String, Vec<String>>,
    /// `ItemGroup/ClCompile/SDLCheck` texts, keyed by the file and the check condition
    file_sdl_checks: HashMap<(String, String), Vec<String>>,
}

impl RawDescriptor {
    /// Parses the project file of `target`. Anything that is not an XML document rooted at a
    /// `Project` element is reported as a [`ConversionError::DescriptorParseError`]
    pub fn parse(target: &str, text: &str) -> Result<Self, ConversionError> {
        let doc = Document::parse(text).map_err(|e| ConversionError::DescriptorParseError {
            target: target.to_string(),
            message: e.to_string(),
        })?;

        let root = doc.root_element();
        if root.tag_name().name() != PROJECT {
            return Err(ConversionError::DescriptorParseError {
                target: target.to_string(),
                message: format!(
                    "unexpected root element <{}>, expected <{PROJECT}>",
                    root.tag_name().name()
                ),
            });
        }

        let mut descriptor = RawDescriptor::default();

        for group in root
            .descendants()
            .filter(|n| is_element(n, ITEM_DEFINITION_GROUP))
        {
            let Some(condition) = group.attribute(CONDITION) else {
                continue;
            };
            for check in children(group, CL_COMPILE).flat_map(|cl| children(cl, SDL_CHECK)) {
                descriptor
                    .project_sdl_checks
                    .entry(condition.trim().to_string())
                    .or_default()
                    .push(node_text(&check));
            }
        }

        for cl in children(root, ITEM_GROUP).flat_map(|group| children(group, CL_COMPILE)) {
            let Some(include) = cl.attribute(INCLUDE) else {
                continue;
            };
            for check in children(cl, SDL_CHECK) {
                let Some(condition) = check.attribute(CONDITION) else {
                    continue;
                };
                descriptor
                    .file_sdl_checks
                    .entry((file_key(include), condition.trim().to_string()))
                    .or_default()
                    .push(node_text(&check));
            }
        }

        Ok(descriptor)
    }

    /// The target level SDL check for the configuration scoped by `condition`
    pub fn project_sdl_check(&self, condition: &str) -> Option<bool> {
        single_flag(self.project_sdl_checks.get(condition.trim()))
    }

    /// The SDL check that `file` overrides for the configuration scoped by `condition`
    pub fn file_sdl_check(&self, file: &str, condition: &str) -> Option<bool> {
        single_flag(
            self.file_sdl_checks
                .get(&(file_key(file), condition.trim().to_string())),
        )
    }
}

/// Only an unambiguous match carries a value. No node or several of them leave the flag unset
fn single_flag(texts: Option<&Vec<String>>) -> Option<bool> {
    match texts.map(Vec::as_slice) {
        Some([text]) => Some(text == "true"),
        _ => None,
    }
}

fn file_key(path: &str) -> String {
    path.trim().replace('\\', "/").to_lowercase()
}

fn is_element(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| is_element(n, name))
}

fn node_text(node: &Node) -> String {
    node.text().unwrap_or_default().trim().to_string()
}
