use super::{bundled_plan, read_page, setup_workspace};
use text_rewriter::config::{
    apply_plan, load_from_path, ApplicationError, FileStatus, RewriteResult,
};
use text_rewriter::transform::TransformError;

const PAGE: &str = r##"import { useState } from "react";
import { useLocation } from "wouter";
import { trpc } from "@/lib/trpc";
import { toast } from "sonner";

// Sektör seçenekleri
const INDUSTRIES = [
  { value: "technology", label: "Teknoloji", icon: "💻", keywords: "modern, dijital, yenilikçi" },
  { value: "other", label: "Diğer", icon: "✨", keywords: "özel, benzersiz" },
];

// Logo stilleri
const LOGO_STYLES = [
  { value: "minimal", label: "Minimalist", description: "Sade ve temiz", preview: "○" },
];

// Renk paletleri
const COLOR_PALETTES = [
  { value: "blue", label: "Mavi", colors: ["#0066FF", "#0099FF"], mood: "Güven" },
];

// İkon tipleri
const ICON_TYPES = [
  { value: "abstract", label: "Soyut", description: "Özgün şekiller" },
];

// Çözünürlük seçenekleri
const RESOLUTIONS = [
  { value: "1K", label: "1K", credits: 15, description: "512x512 px" },
  { value: "4K", label: "4K", credits: 30, description: "2048x2048 px" },
];

export default function LogoGenerator() {
  const [, navigate] = useLocation();

  // Form state
  const [companyName, setCompanyName] = useState("");

  const onGenerated = (results: string[]) =>
    toast.success(`${results.length} logo başarıyla oluşturuldu!`);
  const onDownloaded = () => toast.success("Logo indirildi!");

  return (
    <div>
      <h1>Logo Oluşturucu</h1>
      <p>Profesyonel marka logosu tasarlayın</p>
      <Field label={"Marka Adı *"} value={companyName} />
      <Field label={"İkon Tipi *"} />
    </div>
  );
}
"##;

#[test]
fn test_logo_plan_moves_option_arrays_into_component() {
    let dir = setup_workspace("LogoGenerator.tsx", PAGE);
    let plan = load_from_path(bundled_plan("logo-generator.toml")).unwrap();

    let report = apply_plan(&plan, dir.path(), "1.4.0");
    assert_eq!(report.failed(), 0, "{:?}", report.steps);
    assert!(matches!(report.files[0].1, FileStatus::Rewritten { .. }));

    let page = read_page(&dir, "LogoGenerator.tsx");
    let component = page.find("export default function LogoGenerator() {").unwrap();
    let form_state = page.find("  // Form state").unwrap();
    for array in [
        "const INDUSTRIES = [",
        "const LOGO_STYLES = [",
        "const COLOR_PALETTES = [",
        "const ICON_TYPES = [",
        "const RESOLUTIONS = [",
    ] {
        assert_eq!(page.matches(array).count(), 1, "{array}:\n{page}");
        let at = page.find(array).unwrap();
        assert!(component < at && at < form_state, "{array} not moved:\n{page}");
    }

    assert!(page.contains(
        "import { trpc } from \"@/lib/trpc\";\nimport { useLanguage } from \"@/contexts/LanguageContext\";"
    ));
    assert!(page.contains("  const [, navigate] = useLocation();\n  const { t } = useLanguage();\n"));
    assert!(page.contains("label: t(\"logo.industry.construction\")"));
    assert!(page.contains("description: t(\"logo.iconType.emblem.desc\")"));
    assert!(page.contains("  ];\n\n  // Form state"));
    assert!(!page.contains("Teknoloji"));
    assert!(!page.contains("Minimalist"));
}

#[test]
fn test_logo_plan_translates_labels_and_toasts() {
    let dir = setup_workspace("LogoGenerator.tsx", PAGE);
    let plan = load_from_path(bundled_plan("logo-generator.toml")).unwrap();

    let report = apply_plan(&plan, dir.path(), "1.4.0");
    assert_eq!(report.failed(), 0, "{:?}", report.steps);

    let page = read_page(&dir, "LogoGenerator.tsx");
    assert!(page.contains("<h1>{t(\"logo.title\")}</h1>"));
    assert!(page.contains("<p>{t(\"logo.subtitle\")}</p>"));
    assert!(page.contains("label={t(\"logo.companyName\") + \" *\"}"));
    assert!(page.contains("label={t(\"logo.iconType.title\") + \" *\"}"));
    assert!(page.contains(
        "toast.success(t(\"logo.success.generated\", { count: results.length.toString() }))"
    ));
    assert!(page.contains("toast.success(t(\"logo.success.downloaded\"))"));
}

#[test]
fn test_logo_plan_second_run_changes_nothing() {
    let dir = setup_workspace("LogoGenerator.tsx", PAGE);
    let plan = load_from_path(bundled_plan("logo-generator.toml")).unwrap();

    let _ = apply_plan(&plan, dir.path(), "1.4.0");
    let first = read_page(&dir, "LogoGenerator.tsx");

    let report = apply_plan(&plan, dir.path(), "1.4.0");
    assert_eq!(report.failed(), 0, "{:?}", report.steps);
    assert_eq!(report.files[0].1, FileStatus::Unchanged);
    let (_, moved) = report
        .steps
        .iter()
        .find(|(id, _)| id == "logo-move-options")
        .unwrap();
    assert!(matches!(moved, Ok(RewriteResult::SkippedPresent { .. })));
    assert_eq!(read_page(&dir, "LogoGenerator.tsx"), first);
}

#[test]
fn test_logo_plan_missing_region_leaves_page_untouched() {
    let page = PAGE.replace("// Sektör seçenekleri\n", "");
    let dir = setup_workspace("LogoGenerator.tsx", &page);
    let plan = load_from_path(bundled_plan("logo-generator.toml")).unwrap();

    let report = apply_plan(&plan, dir.path(), "1.4.0");
    assert_eq!(report.files[0].1, FileStatus::Failed);
    let (_, moved) = report
        .steps
        .iter()
        .find(|(id, _)| id == "logo-move-options")
        .unwrap();
    assert!(matches!(
        moved,
        Err(ApplicationError::Transform {
            source: TransformError::MarkerNotFound { .. },
            ..
        })
    ));
    assert_eq!(read_page(&dir, "LogoGenerator.tsx"), page);
}
