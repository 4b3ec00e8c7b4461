//! Tree structure rendering for model visualization

use console::Style;

use super::format::format_bytes;

/// Represents a node in a tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub size: Option<u64>,
    pub children: Vec<TreeNode>,
    /// Key/value pairs in insertion order
    pub metadata: Vec<(String, String)>,
    pub external_refs: Vec<ExternalRef>,
}

/// Types of nodes in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Root,
    Header,
    Table,
    Mesh,
    Tag,
    Property,
}

/// File referenced by a model
#[derive(Debug, Clone)]
pub struct ExternalRef {
    pub path: String,
    pub ref_type: RefType,
    pub exists: Option<bool>,
}

/// Types of external references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefType {
    Texture,
    Shader,
    Model,
    Skin,
    Animation,
    Unknown,
}

/// Options for tree rendering
#[derive(Debug, Clone)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub show_external_refs: bool,
    pub no_color: bool,
    pub show_metadata: bool,
    pub compact: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            show_external_refs: true,
            no_color: false,
            show_metadata: true,
            compact: false,
        }
    }
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            size: None,
            children: Vec::new(),
            metadata: Vec::new(),
            external_refs: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Set the size of this node
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }

    /// Add external reference
    pub fn with_external_ref(mut self, path: &str, ref_type: RefType) -> Self {
        self.external_refs.push(ExternalRef {
            path: path.to_string(),
            ref_type,
            exists: None,
        });
        self
    }
}

impl ExternalRef {
    pub fn icon(&self) -> &'static str {
        match self.ref_type {
            RefType::Texture => "🖼️",
            RefType::Shader => "🎨",
            RefType::Model => "🏗️",
            RefType::Skin => "👕",
            RefType::Animation => "📽️",
            RefType::Unknown => "📁",
        }
    }

    /// Color style based on existence
    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self.exists {
                Some(true) => Style::new().green(),
                Some(false) => Style::new().red(),
                None => Style::new().yellow(),
            }
        }
    }
}

impl NodeType {
    pub fn icon(&self) -> &'static str {
        match self {
            NodeType::Root => "📁",
            NodeType::Header => "📋",
            NodeType::Table => "📊",
            NodeType::Mesh => "🔺",
            NodeType::Tag => "📍",
            NodeType::Property => "🏷️",
        }
    }

    pub fn style(&self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                NodeType::Root => Style::new().bold().cyan(),
                NodeType::Header => Style::new().bold().yellow(),
                NodeType::Table => Style::new().magenta(),
                NodeType::Mesh => Style::new().green(),
                NodeType::Tag => Style::new().blue(),
                NodeType::Property => Style::new().dim(),
            }
        }
    }
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let icon = node.node_type.icon();
    let style = node.node_type.style(options.no_color);
    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut line = format!(
        "{}{}{} {}",
        prefix,
        connector,
        icon,
        style.apply_to(&node.name)
    );

    if let Some(size) = node.size {
        line.push_str(&format!(" ({})", format_bytes(size)));
    }

    if options.show_metadata && options.compact && !node.metadata.is_empty() {
        let meta_parts: Vec<String> = node
            .metadata
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect();
        line.push_str(&format!(" [{}]", meta_parts.join(", ")));
    }

    output.push_str(&line);
    output.push('\n');

    let child_prefix = if depth == 0 {
        ""
    } else if is_last {
        "    "
    } else {
        "│   "
    };
    let detail_prefix = format!("{prefix}{child_prefix}    ");

    if options.show_metadata && !options.compact {
        let meta_style = if options.no_color {
            Style::new()
        } else {
            Style::new().dim()
        };
        for (key, value) in &node.metadata {
            output.push_str(&format!(
                "{}🏷️  {}: {}\n",
                detail_prefix,
                meta_style.apply_to(key),
                value
            ));
        }
    }

    if options.show_external_refs {
        for ext_ref in &node.external_refs {
            output.push_str(&format!(
                "{}└─→ {} {}\n",
                detail_prefix,
                ext_ref.icon(),
                ext_ref.style(options.no_color).apply_to(&ext_ref.path)
            ));
        }
    }

    let new_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{prefix}{child_prefix}")
    };
    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i == node.children.len() - 1;
        render_node(
            child,
            output,
            &new_prefix,
            is_last_child,
            depth + 1,
            options,
        );
    }
}

/// Detect reference type from file extension
pub fn detect_ref_type(path: &str) -> RefType {
    let path_lower = path.to_lowercase();

    if [".tga", ".jpg", ".jpeg", ".png"]
        .iter()
        .any(|ext| path_lower.ends_with(ext))
    {
        RefType::Texture
    } else if path_lower.ends_with(".md3") {
        RefType::Model
    } else if path_lower.ends_with(".skin") {
        RefType::Skin
    } else if path_lower.ends_with(".cfg") {
        RefType::Animation
    } else if path_lower.starts_with("textures/") || path_lower.starts_with("models/") {
        RefType::Shader
    } else {
        RefType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_rendering() {
        let root = TreeNode::new("upper.md3", NodeType::Root)
            .with_size(1024)
            .with_metadata("version", 15)
            .add_child(TreeNode::new("Header", NodeType::Header).with_metadata("frames", 153))
            .add_child(
                TreeNode::new("Meshes", NodeType::Table).add_child(
                    TreeNode::new("u_torso", NodeType::Mesh)
                        .with_external_ref("models/players/sarge/band.tga", RefType::Texture),
                ),
            );

        let options = TreeOptions {
            no_color: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&root, &options);

        assert!(output.contains("upper.md3 (1.02 kB)"));
        assert!(output.contains("├── 📋 Header"));
        assert!(output.contains("frames: 153"));
        assert!(output.contains("└── 📊 Meshes"));
        assert!(output.contains("    └── 🔺 u_torso"));
        assert!(output.contains("└─→ 🖼️ models/players/sarge/band.tga"));
    }

    #[test]
    fn test_max_depth() {
        let root = TreeNode::new("root", NodeType::Root)
            .add_child(TreeNode::new("a", NodeType::Table).add_child(TreeNode::new("b", NodeType::Mesh)));

        let options = TreeOptions {
            max_depth: Some(1),
            no_color: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&root, &options);
        assert!(output.contains("a"));
        assert!(!output.contains("b\n"));
    }

    #[test]
    fn test_ref_type_detection() {
        assert_eq!(detect_ref_type("models/players/sarge/band.tga"), RefType::Texture);
        assert_eq!(detect_ref_type("head.MD3"), RefType::Model);
        assert_eq!(detect_ref_type("lower_default.skin"), RefType::Skin);
        assert_eq!(detect_ref_type("animation.cfg"), RefType::Animation);
        assert_eq!(detect_ref_type("textures/sfx/flame"), RefType::Shader);
        assert_eq!(detect_ref_type("unknown"), RefType::Unknown);
    }
}
