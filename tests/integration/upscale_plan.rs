use super::{bundled_plan, read_page, setup_workspace};
use text_rewriter::config::{apply_plan, load_from_path, FileStatus};

const PAGE: &str = r#"import { useState } from "react";
import { cn } from "@/lib/utils";
import { getLoginUrl } from "@/const";
import Header from "@/components/Header";
import GenerationLoadingCard from "@/components/GenerationLoadingCard";

export default function Upscale() {
  const { user, loading: authLoading } = useAuth();

  const onError = () => toast.error("Yetersiz kredi. Lütfen kredi satın alın.");
  const onTimeout = () => toast.error("İşlem zaman aşımına uğradı. Lütfen tekrar deneyin.");
  const upload = async () => {
    throw new Error("Görsel yüklenemedi");
  };
  const onDownloadFailed = () => toast.error("İndirme başarısız oldu");

  return (
    <div>
      <p className="text-xs text-white mt-2">Yükleniyor... {uploadProgress}%</p>
      <Button>{isUploading ? "Yükleniyor..." : "İşleniyor..."}</Button>
      <Button>
        Upscale Yap ({getCreditCost()} Kredi)
      </Button>
      <a href={getLoginUrl()}>
        <Button>Giriş Yap</Button>
      </a>
      <Button onClick={download}>
        <Download className="h-4 w-4 mr-2" />
        İndir
      </Button>
      <span>İndirme bağlantısı</span>
      <Button>Tekrar Dene</Button>
      <CardTitle className="text-lg flex items-center gap-2">
                  <ImageIcon className="h-5 w-5" />
                  Sonuç
                </CardTitle>
    </div>
  );
}
"#;

#[test]
fn test_upscale_plan_adds_import_and_hook() {
    let dir = setup_workspace("Upscale.tsx", PAGE);
    let plan = load_from_path(bundled_plan("upscale.toml")).unwrap();

    let report = apply_plan(&plan, dir.path(), "1.4.0");
    assert_eq!(report.failed(), 0, "{:?}", report.steps);
    assert!(matches!(report.files[0].1, FileStatus::Rewritten { .. }));

    let page = read_page(&dir, "Upscale.tsx");
    assert!(page.contains(
        "import GenerationLoadingCard from \"@/components/GenerationLoadingCard\";\nimport { useLanguage } from \"@/contexts/LanguageContext\";\n"
    ));
    assert!(page.contains(
        "export default function Upscale() {\n  const { t } = useLanguage();\n  const { user, loading: authLoading } = useAuth();"
    ));
}

#[test]
fn test_upscale_plan_translates_messages_and_labels() {
    let dir = setup_workspace("Upscale.tsx", PAGE);
    let plan = load_from_path(bundled_plan("upscale.toml")).unwrap();

    let report = apply_plan(&plan, dir.path(), "1.4.0");
    assert_eq!(report.failed(), 0, "{:?}", report.steps);

    let page = read_page(&dir, "Upscale.tsx");
    assert!(page.contains("toast.error(t(\"upscale.errors.insufficientCredits\"))"));
    assert!(page.contains("toast.error(t(\"upscale.errors.timeoutRetry\"))"));
    assert!(page.contains("throw new Error(t(\"upscale.errors.uploadFailed\"));"));
    assert!(page.contains("toast.error(t(\"upscale.toast.downloadFailed\"))"));
    assert!(page.contains(
        "<p className=\"text-xs text-white mt-2\">{t(\"upscale.uploading\")} {uploadProgress}%</p>"
    ));
    assert!(page.contains("{isUploading ? t(\"upscale.uploading\") : t(\"upscale.processing\")}"));
    assert!(page.contains("{t(\"upscale.upscaleButton\", { credits: getCreditCost() })}"));
    assert!(page.contains("<Button>{t(\"upscale.login\")}</Button>"));
    assert!(page.contains("/>\n        {t(\"upscale.download\")}\n      </Button>"));
    assert!(page.contains("<Button>{t(\"upscale.retry\")}</Button>"));
    assert!(page.contains("                  {t(\"upscale.resultTitle\")}\n                </CardTitle>"));
    assert!(page.contains("<span>İndirme bağlantısı</span>"));
}
