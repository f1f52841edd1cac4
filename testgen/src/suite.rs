//! Test suite scaffolding per target language.
//!
//! A layout wraps already rendered test bodies in the test framework's
//! file structure: a header, one block per test and a footer. Per-file
//! output adds an index file that ties the test files together.

use crate::TargetLanguage;
use serde::Serialize;

/// First line of every generated file, written as a comment.
pub const GENERATED_HEADER: &str = "Test code generated by mbt";

/// One generated file, held in memory until written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// The files produced by one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedSuite {
    pub name: String,
    pub files: Vec<GeneratedFile>,
}

impl GeneratedSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
        }
    }

    pub fn push(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    /// Get a file by name.
    pub fn file(&self, name: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// What a layout needs to know about the file being rendered.
#[derive(Debug, Clone, Copy)]
pub struct SuiteInfo<'a> {
    /// Class, module or page name; the file stem.
    pub name: &'a str,
    pub system_name: &'a str,
}

/// File scaffolding hooks for one language.
pub struct SuiteLayout {
    pub header: fn(&SuiteInfo) -> String,
    pub test_case: fn(&SuiteInfo, &str, &str) -> String,
    pub footer: fn(&SuiteInfo, &[String]) -> String,
    /// Index or driver file listing the per-test file stems.
    pub index: fn(&SuiteInfo, &[String]) -> String,
}

impl SuiteLayout {
    /// The layout for a language.
    pub fn for_language(language: TargetLanguage) -> &'static SuiteLayout {
        match language {
            TargetLanguage::Java => &JAVA,
            TargetLanguage::CSharp => &CSHARP,
            TargetLanguage::Cpp => &CPP,
            TargetLanguage::Python => &PYTHON,
            TargetLanguage::Vb => &VB,
            TargetLanguage::C => &C,
            TargetLanguage::Html => &HTML,
            TargetLanguage::Kbt | TargetLanguage::Rpc | TargetLanguage::SeleniumDriver => &KEYWORD,
            TargetLanguage::Uft => &UFT,
        }
    }

    /// A complete file holding every test.
    pub fn render(&self, info: &SuiteInfo, tests: &[(String, String)]) -> String {
        let mut contents = (self.header)(info);
        for (id, body) in tests {
            contents.push_str(&(self.test_case)(info, id, body));
        }
        let ids: Vec<String> = tests.iter().map(|(id, _)| id.clone()).collect();
        contents.push_str(&(self.footer)(info, &ids));
        contents
    }
}

static JAVA: SuiteLayout = SuiteLayout {
    header: |info| {
        format!(
            "// {GENERATED_HEADER}\nimport static org.junit.Assert.*;\nimport org.junit.Test;\n\
             \npublic class {} {{\n",
            info.name
        )
    },
    test_case: |_, id, body| {
        format!("\n\t@Test\n\tpublic void test{id}() throws Exception {{{body}\n\t}}\n")
    },
    footer: |_, _| "}\n".to_string(),
    index: |info, stems| {
        let classes: Vec<String> = stems.iter().map(|stem| format!("{stem}.class")).collect();
        format!(
            "// {GENERATED_HEADER}\nimport org.junit.runner.RunWith;\n\
             import org.junit.runners.Suite;\n\n\
             @RunWith(Suite.class)\n@Suite.SuiteClasses({{ {} }})\npublic class {} {{\n}}\n",
            classes.join(", "),
            info.name
        )
    },
};

static CSHARP: SuiteLayout = SuiteLayout {
    header: |info| {
        format!(
            "// {GENERATED_HEADER}\nusing System;\n\
             using Microsoft.VisualStudio.TestTools.UnitTesting;\n\n\
             [TestClass]\npublic class {}\n{{\n",
            info.name
        )
    },
    test_case: |_, id, body| {
        format!("\n\t[TestMethod]\n\tpublic void test{id}()\n\t{{{body}\n\t}}\n")
    },
    footer: |_, _| "}\n".to_string(),
    index: |info, stems| comment_index("//", info, stems, "cs"),
};

static CPP: SuiteLayout = SuiteLayout {
    header: |_| format!("// {GENERATED_HEADER}\n#include <gtest/gtest.h>\n"),
    test_case: |info, id, body| format!("\nTEST({}, test{id}) {{{body}\n}}\n", info.name),
    footer: |_, _| String::new(),
    index: |_, stems| {
        let includes: String =
            stems.iter().map(|stem| format!("#include \"{stem}.cpp\"\n")).collect();
        format!("// {GENERATED_HEADER}\n{includes}")
    },
};

static PYTHON: SuiteLayout = SuiteLayout {
    header: |info| {
        format!(
            "# {GENERATED_HEADER}\nimport unittest\n\n\nclass {}(unittest.TestCase):\n",
            info.name
        )
    },
    test_case: |_, id, body| {
        let body = if body.trim().is_empty() { "\n        pass" } else { body };
        format!("\n    def test{id}(self):{body}\n")
    },
    footer: |_, _| "\n\nif __name__ == '__main__':\n    unittest.main()\n".to_string(),
    index: |_, stems| {
        let imports: String = stems.iter().map(|stem| format!("from {stem} import *\n")).collect();
        format!(
            "# {GENERATED_HEADER}\nimport unittest\n{imports}\n\n\
             if __name__ == '__main__':\n    unittest.main()\n"
        )
    },
};

static VB: SuiteLayout = SuiteLayout {
    header: |info| {
        format!(
            "' {GENERATED_HEADER}\nImports Microsoft.VisualStudio.TestTools.UnitTesting\n\n\
             <TestClass()>\nPublic Class {}\n",
            info.name
        )
    },
    test_case: |_, id, body| {
        format!("\n\t<TestMethod()>\n\tPublic Sub test{id}(){body}\n\tEnd Sub\n")
    },
    footer: |_, _| "End Class\n".to_string(),
    index: |info, stems| comment_index("'", info, stems, "vb"),
};

static C: SuiteLayout = SuiteLayout {
    header: |_| format!("// {GENERATED_HEADER}\n#include <assert.h>\n"),
    test_case: |_, id, body| format!("\nvoid test{id}(void) {{{body}\n}}\n"),
    footer: |_, ids| {
        let calls: String = ids.iter().map(|id| format!("\ttest{id}();\n")).collect();
        format!("\nint main(void) {{\n{calls}\treturn 0;\n}}\n")
    },
    index: |info, stems| comment_index("//", info, stems, "c"),
};

static HTML: SuiteLayout = SuiteLayout {
    header: |info| {
        format!(
            "<!-- {GENERATED_HEADER} -->\n<html>\n<head><title>{}</title></head>\n<body>\n",
            info.name
        )
    },
    test_case: |_, id, body| {
        let rows: String = body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| format!("<tr><td>{line}</td></tr>\n"))
            .collect();
        format!("<table border=\"1\">\n<tr><th>Test {id}</th></tr>\n{rows}</table>\n")
    },
    footer: |_, _| "</body>\n</html>\n".to_string(),
    index: |info, stems| {
        let links: String = stems
            .iter()
            .map(|stem| format!("<li><a href=\"{stem}.html\">{stem}</a></li>\n"))
            .collect();
        format!(
            "<!-- {GENERATED_HEADER} -->\n<html>\n<head><title>{}</title></head>\n\
             <body>\n<ul>\n{links}</ul>\n</body>\n</html>\n",
            info.name
        )
    },
};

static KEYWORD: SuiteLayout = SuiteLayout {
    header: |_| format!("# {GENERATED_HEADER}\n"),
    test_case: |_, id, body| format!("\n*** Test {id} ***{body}\n"),
    footer: |_, _| String::new(),
    index: |info, stems| comment_index("#", info, stems, "txt"),
};

static UFT: SuiteLayout = SuiteLayout {
    header: |info| format!("' {GENERATED_HEADER}\n' System under test: {}\n", info.system_name),
    test_case: |_, id, body| format!("\n' Test {id}{body}\n"),
    footer: |_, _| String::new(),
    index: |info, stems| {
        let runs: String = stems
            .iter()
            .map(|stem| format!("ExecuteFile \"{stem}.vbs\"\n"))
            .collect();
        format!("' {GENERATED_HEADER}\n' Suite {}\n{runs}", info.name)
    },
};

fn comment_index(prefix: &str, info: &SuiteInfo, stems: &[String], extension: &str) -> String {
    let mut index = format!(
        "{prefix} {GENERATED_HEADER}\n{prefix} Test files of suite {}\n",
        info.name
    );
    for stem in stems {
        index.push_str(&format!("{prefix} {stem}.{extension}\n"));
    }
    index
}
