//! Property-list markup: a wrapper document plus one document per checklist
//!
//! Elements are built on an explicit stack. Conditions keep a second stack
//! of the containers they opened so that a chain of the same binary
//! operator collapses into a single element: `a && b && c` becomes one
//! `<and>` with three children. A condition root or a `NOT` sits on the
//! same stack and breaks a chain; a bare grouping is transparent.

use crate::ast::{
    AbstractSyntaxTree, BinaryCondition, Check, CheckKind, Checklist, CommandBinding, Condition,
    Marker, Operator, Page, PropertyBinding, Terminal, UnaryCondition, Value, ValueBinding,
    VisitResult, Visitor,
};
use crate::backend::element::{Document, Element};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::{write_output, Generator, OutputContext};
use crate::log_debug;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub const WRAPPER_FILE: &str = "checklists.xml";
const DEFAULT_TITLE: &str = "Checklists";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Root,
    Not,
    Binary(Operator),
}

#[derive(Debug, Clone, Copy)]
struct OpenCondition {
    container: Container,
    /// False when the container was merged into its parent's element
    has_element: bool,
}

pub struct MarkupBackend {
    context: OutputContext,
    generated_on: DateTime<Utc>,
    wrapper: Element,
    elements: Vec<Element>,
    conditions: Vec<OpenCondition>,
    multi_page: bool,
    written: Vec<PathBuf>,
}

impl MarkupBackend {
    pub fn new(context: OutputContext) -> Self {
        Self {
            context,
            generated_on: Utc::now(),
            wrapper: Element::new("PropertyList"),
            elements: Vec::new(),
            conditions: Vec::new(),
            multi_page: false,
            written: Vec::new(),
        }
    }

    /// Checklist document name: lowercased title, spaces as hyphens
    pub fn file_name(checklist: &Checklist) -> String {
        format!("{}.xml", checklist.file_stem())
    }

    fn header_comment(&self) -> String {
        format!(
            "Generated by clgen from {} on {}",
            self.context.source_name,
            self.generated_on.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }

    fn top(&mut self) -> BackendResult<&mut Element> {
        self.elements
            .last_mut()
            .ok_or_else(|| BackendError::malformed("no open element"))
    }

    fn open(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Pop the innermost element and append it to its parent
    fn close(&mut self) -> VisitResult {
        let element = self
            .elements
            .pop()
            .ok_or_else(|| BackendError::malformed("close without open element"))?;
        self.top()?.push(element);
        Ok(())
    }

    fn open_condition(&mut self, container: Container, tag: Option<&str>) {
        if let Some(tag) = tag {
            self.open(Element::new(tag));
        }
        self.conditions.push(OpenCondition {
            container,
            has_element: tag.is_some(),
        });
    }

    fn close_condition(&mut self) -> VisitResult {
        let open = self
            .conditions
            .pop()
            .ok_or_else(|| BackendError::malformed("condition stack underflow"))?;
        if open.has_element {
            self.close()?;
        }
        Ok(())
    }

    fn write(&mut self, file_name: &str, document: &Document) -> VisitResult {
        let path = self.context.path(file_name);
        let written = write_output(&path, &document.serialize())?;
        self.written.push(written);
        Ok(())
    }
}

impl Generator for MarkupBackend {
    fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}

/// Text of a literal or alias, with the type attribute for literals
fn value_text(value: &Value) -> (String, Option<&'static str>) {
    match value {
        Value::Symbol(symbol) => (symbol.expansion().to_string(), None),
        literal => (literal.to_string(), literal.ty().markup_attribute()),
    }
}

impl Visitor for MarkupBackend {
    fn enter_tree(&mut self, tree: &AbstractSyntaxTree) -> VisitResult {
        let title = tree.project.as_deref().unwrap_or(DEFAULT_TITLE);
        self.wrapper = Element::new("PropertyList");
        self.wrapper.push_text("title", title, None);
        Ok(())
    }

    fn exit_tree(&mut self, _tree: &AbstractSyntaxTree) -> VisitResult {
        let wrapper = std::mem::replace(&mut self.wrapper, Element::new("PropertyList"));
        let document = Document::new(wrapper).with_comment(self.header_comment());
        self.write(WRAPPER_FILE, &document)
    }

    fn enter_checklist(&mut self, checklist: &Checklist) -> VisitResult {
        let file_name = Self::file_name(checklist);
        let mut include = Element::new("checklist");
        include.set_attribute("include", file_name);
        self.wrapper.push(include);

        let mut root = Element::new("PropertyList");
        root.push_text("title", &checklist.title, None);
        self.elements.clear();
        self.open(root);
        self.multi_page = checklist.pages.len() > 1;
        Ok(())
    }

    fn exit_checklist(&mut self, checklist: &Checklist) -> VisitResult {
        let root = self
            .elements
            .pop()
            .ok_or_else(|| BackendError::malformed("checklist document was not opened"))?;
        if !self.elements.is_empty() {
            return Err(BackendError::malformed(format!(
                "{} element(s) left open in checklist '{}'",
                self.elements.len(),
                checklist.title
            )));
        }
        log_debug!("Checklist document built", "title" => &checklist.title);

        let document = Document::new(root).with_comment(self.header_comment());
        self.write(&Self::file_name(checklist), &document)
    }

    fn enter_page(&mut self, _page: &Page) -> VisitResult {
        if self.multi_page {
            self.open(Element::new("page"));
        }
        Ok(())
    }

    fn exit_page(&mut self, _page: &Page) -> VisitResult {
        if self.multi_page {
            self.close()?;
        }
        Ok(())
    }

    fn enter_check(&mut self, check: &Check) -> VisitResult {
        let mut element = Element::new("item");
        match &check.kind {
            CheckKind::Spacer => element.push(Element::new("name")),
            CheckKind::Subtitle(text) => element.push_text("name", text, None),
            CheckKind::Normal { item, state } => {
                element.push_text("name", &item.name, None);
                element.push_text("value", &state.name, None);
                for value in &check.additional_values {
                    element.push_text("value", value, None);
                }
            }
        }
        self.open(element);
        Ok(())
    }

    fn exit_check(&mut self, _check: &Check) -> VisitResult {
        self.close()
    }

    fn enter_marker(&mut self, marker: &Marker) -> VisitResult {
        let mut element = Element::new("marker");
        element.push_text("x-m", format!("{:?}", marker.coordinate.x), None);
        element.push_text("y-m", format!("{:?}", marker.coordinate.y), None);
        element.push_text("z-m", format!("{:?}", marker.coordinate.z), None);
        element.push_text("scale", format!("{:?}", marker.scale), None);
        self.top()?.push(element);
        Ok(())
    }

    fn enter_condition(&mut self, _condition: &Condition) -> VisitResult {
        self.open_condition(Container::Root, Some("condition"));
        Ok(())
    }

    fn exit_condition(&mut self, _condition: &Condition) -> VisitResult {
        self.close_condition()
    }

    fn enter_binary_condition(&mut self, condition: &BinaryCondition) -> VisitResult {
        let container = Container::Binary(condition.operator);
        let nested = matches!(self.conditions.last(), Some(open) if open.container == container);
        let tag = (!nested).then(|| condition.operator.markup_tag());
        self.open_condition(container, tag);
        Ok(())
    }

    fn exit_binary_condition(&mut self, _condition: &BinaryCondition) -> VisitResult {
        self.close_condition()
    }

    fn enter_unary_condition(&mut self, condition: &UnaryCondition) -> VisitResult {
        if let Some(operator) = condition.operator {
            self.open_condition(Container::Not, Some(operator.markup_tag()));
        }
        Ok(())
    }

    fn exit_unary_condition(&mut self, condition: &UnaryCondition) -> VisitResult {
        if condition.is_grouping() {
            return Ok(());
        }
        self.close_condition()
    }

    fn enter_terminal(&mut self, terminal: &Terminal) -> VisitResult {
        let name = if terminal.value.is_symbol() { "property" } else { "value" };
        let (text, ty) = value_text(&terminal.value);
        self.top()?.push_text(name, text, ty);
        Ok(())
    }

    fn enter_value_binding(&mut self, binding: &ValueBinding) -> VisitResult {
        let mut element = Element::new("binding");
        element.push_text("command", "property-assign", None);
        element.push_text("property", binding.symbol.expansion(), None);
        element.push_text(
            "value",
            binding.value.to_string(),
            binding.symbol.ty().markup_attribute(),
        );
        self.open(element);
        Ok(())
    }

    fn exit_value_binding(&mut self, _binding: &ValueBinding) -> VisitResult {
        self.close()
    }

    fn enter_property_binding(&mut self, binding: &PropertyBinding) -> VisitResult {
        let mut element = Element::new("binding");
        element.push_text("command", "property-assign", None);
        element.push_text("property", binding.target.expansion(), None);
        element.push_text("property", binding.source.expansion(), None);
        self.open(element);
        Ok(())
    }

    fn exit_property_binding(&mut self, _binding: &PropertyBinding) -> VisitResult {
        self.close()
    }

    fn enter_command_binding(&mut self, binding: &CommandBinding) -> VisitResult {
        let mut element = Element::new("binding");
        element.push_text("command", &binding.command, None);
        for (name, value) in &binding.params {
            let (text, ty) = value_text(value);
            element.push_text(name, text, ty);
        }
        self.open(element);
        Ok(())
    }

    fn exit_command_binding(&mut self, _binding: &CommandBinding) -> VisitResult {
        self.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Visitable;
    use crate::passes::{ChecklistPass, DiagnosticSink, ItemPass};
    use crate::syntax::parse_source;
    use std::fs;
    use std::path::Path;

    fn compile(source: &str) -> AbstractSyntaxTree {
        let tree = parse_source(source).unwrap();
        let mut sink = DiagnosticSink::new();
        let items = ItemPass::run(&tree, &mut sink).unwrap().items;
        let ast = ChecklistPass::run(&tree, &items, &mut sink).unwrap();
        assert!(!sink.has_errors(), "{:?}", sink.messages());
        ast
    }

    fn generate(source: &str, dir: &Path) -> Vec<PathBuf> {
        let ast = compile(source);
        let mut backend = MarkupBackend::new(OutputContext::new(dir, "test.clg"));
        ast.accept(&mut backend).unwrap();
        backend.into_written()
    }

    fn condition_markup(condition: &str) -> String {
        let dir = tempfile::tempdir().unwrap();
        let source = format!(
            r#"a = "/a"; b = "/b"; c = "/c";
            item("Lights") {{ state("ON", {}); }}
            checklist("Test") {{ check("Lights", "ON"); }}"#,
            condition
        );
        generate(&source, dir.path());
        fs::read_to_string(dir.path().join("test.xml")).unwrap()
    }

    #[test]
    fn same_operator_chain_is_flattened() {
        let text = condition_markup("a && b && c");
        assert!(text.contains(concat!(
            "    <condition>\n",
            "      <and>\n",
            "        <property>/a</property>\n",
            "        <property>/b</property>\n",
            "        <property>/c</property>\n",
            "      </and>\n",
            "    </condition>\n",
        )));
    }

    #[test]
    fn different_operator_nests() {
        let text = condition_markup("a && (b || c)");
        assert!(text.contains(concat!(
            "      <and>\n",
            "        <property>/a</property>\n",
            "        <or>\n",
            "          <property>/b</property>\n",
            "          <property>/c</property>\n",
            "        </or>\n",
            "      </and>\n",
        )));
    }

    #[test]
    fn negation_breaks_a_chain() {
        let text = condition_markup("a && !(b && c)");
        assert!(text.contains(concat!(
            "      <and>\n",
            "        <property>/a</property>\n",
            "        <not>\n",
            "          <and>\n",
            "            <property>/b</property>\n",
            "            <property>/c</property>\n",
            "          </and>\n",
            "        </not>\n",
            "      </and>\n",
        )));
    }

    #[test]
    fn writes_wrapper_and_checklist_documents() {
        let dir = tempfile::tempdir().unwrap();
        let written = generate(
            r#"project("Cessna 172P");
            item("Landing Gear") {
                gear = "/controls/gear/gear-down";
                state("DOWN", gear) { gear = true; }
                marker(0.1, -0.2, 0.3, 1.5);
            }
            checklist("Before Landing") {
                text("Approach");
                check("Landing Gear", "DOWN", "Three green");
                text();
            }"#,
            dir.path(),
        );
        assert_eq!(
            written,
            vec![dir.path().join("before-landing.xml"), dir.path().join(WRAPPER_FILE)]
        );

        let wrapper = fs::read_to_string(dir.path().join(WRAPPER_FILE)).unwrap();
        assert!(wrapper.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- Generated by clgen from test.clg on "));
        assert!(wrapper.contains("  <title>Cessna 172P</title>\n  <checklist include=\"before-landing.xml\"/>\n"));

        let checklist = fs::read_to_string(dir.path().join("before-landing.xml")).unwrap();
        assert!(!checklist.contains("<page>"));
        assert!(checklist.contains("  <item>\n    <name>Approach</name>\n  </item>\n"));
        assert!(checklist.contains("  <item>\n    <name/>\n  </item>\n"));
        assert!(checklist.contains(concat!(
            "    <name>Landing Gear</name>\n",
            "    <value>DOWN</value>\n",
            "    <value>Three green</value>\n",
            "    <marker>\n",
            "      <x-m>0.1</x-m>\n",
            "      <y-m>-0.2</y-m>\n",
            "      <z-m>0.3</z-m>\n",
            "      <scale>1.5</scale>\n",
            "    </marker>\n",
            "    <condition>\n",
            "      <property>/controls/gear/gear-down</property>\n",
            "    </condition>\n",
            "    <binding>\n",
            "      <command>property-assign</command>\n",
            "      <property>/controls/gear/gear-down</property>\n",
            "      <value type=\"bool\">true</value>\n",
            "    </binding>\n",
        )));
    }

    #[test]
    fn pages_appear_only_for_multi_page_checklists() {
        let dir = tempfile::tempdir().unwrap();
        generate(
            r#"checklist("Shutdown") { page { text("One"); } page { text("Two"); } }
            checklist("Parking") { page { text("Only"); } }
            checklist("Taxi") { text("Lights"); text(); text("Brakes"); }"#,
            dir.path(),
        );
        let shutdown = fs::read_to_string(dir.path().join("shutdown.xml")).unwrap();
        assert_eq!(shutdown.matches("<page>").count(), 2);
        let parking = fs::read_to_string(dir.path().join("parking.xml")).unwrap();
        assert!(!parking.contains("<page>"));
        let taxi = fs::read_to_string(dir.path().join("taxi.xml")).unwrap();
        assert!(!taxi.contains("<page>"));
        assert_eq!(taxi.matches("<item>").count(), 3);
        let wrapper = fs::read_to_string(dir.path().join(WRAPPER_FILE)).unwrap();
        assert!(wrapper.contains("<title>Checklists</title>"));
    }

    #[test]
    fn command_parameters_carry_literal_types() {
        let dir = tempfile::tempdir().unwrap();
        generate(
            r#"item("Radio") {
                power = "/radio/power";
                state("ON") {
                    if (power) { command("nasal", script = "radio.on()", volume = 3, fast = true, target = power); }
                }
            }
            checklist("Radios") { check("Radio", "ON"); }"#,
            dir.path(),
        );
        let text = fs::read_to_string(dir.path().join("radios.xml")).unwrap();
        assert!(text.contains(concat!(
            "    <binding>\n",
            "      <command>nasal</command>\n",
            "      <script type=\"string\">radio.on()</script>\n",
            "      <volume>3</volume>\n",
            "      <fast type=\"bool\">true</fast>\n",
            "      <target>/radio/power</target>\n",
            "      <condition>\n",
            "        <property>/radio/power</property>\n",
            "      </condition>\n",
            "    </binding>\n",
        )));
    }

    #[test]
    fn unwritable_directory_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let ast = compile(r#"checklist("A") { text(); }"#);
        let mut backend = MarkupBackend::new(OutputContext::new(&missing, "a.clg"));
        let error = ast.accept(&mut backend).unwrap_err();
        assert_eq!(
            error.to_string(),
            format!("Failed to write output file: {}", missing.join("a.xml").display())
        );
    }
}
