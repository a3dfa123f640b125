use super::{bundled_plan, read_page, setup_workspace};
use std::fs;
use tempfile::TempDir;
use text_rewriter::config::{apply_plan, load_from_path, FileStatus};

const VERIFY_EMAIL: &str = r#"import { useState, useEffect } from "react";

export default function VerifyEmailPage() {
  const [code, setCode] = useState("");
  const [email, setEmail] = useState("");

  const resend = () => toast.error("Kod gönderilemedi. Lütfen daha sonra tekrar deneyin.");
  const failed = () => toast.error("Kod gönderilemedi");

  return <Button>{"Kodu Doğrula"}</Button>;
}
"#;

const SKIN: &str = r#"import { useState, useRef } from "react";

export default function SkinEnhancement() {
  const { user, isAuthenticated } = useAuth();
  const onDone = () => toast.success("Cilt iyileştirme tamamlandı!");
  const onTooLarge = () => toast.error("Dosya boyutu 10MB'dan küçük olmalıdır");
}
"#;

const COMMUNITY: &str = r#"import { useState } from "react";

export default function CommunityCharacters() {
  const [searchQuery, setSearchQuery] = useState("");
  const empty = searchQuery ? "Aramanızla eşleşen karakter bulunamadı." : "Henüz paylaşılan karakter yok.";
  return <Input placeholder="Karakter veya kullanıcı ara..." />;
}
"#;

const BLOG: &str = r#"import { useState } from "react";

export default function Blog() {
  const [searchQuery, setSearchQuery] = useState("");
  const [selectedCategory, setSelectedCategory] = useState("Tümü");
  const { data: categories } = trpc.blog.categories.useQuery();
  const posts = trpc.blog.list.useQuery({ category: selectedCategory === "Tümü" ? undefined : selectedCategory });
  const categoryList = categories || ["Tümü"];
  return <Input placeholder="Blog yazısı ara..." />;
}
"#;

fn setup_pages() -> TempDir {
    let dir = setup_workspace("VerifyEmailPage.tsx", VERIFY_EMAIL);
    let pages = dir.path().join("client/src/pages");
    fs::write(pages.join("SkinEnhancement.tsx"), SKIN).unwrap();
    fs::write(pages.join("CommunityCharacters.tsx"), COMMUNITY).unwrap();
    fs::write(pages.join("Blog.tsx"), BLOG).unwrap();
    dir
}

#[test]
fn test_remaining_pages_plan_rewrites_every_page() {
    let dir = setup_pages();
    let plan = load_from_path(bundled_plan("remaining-pages.toml")).unwrap();

    let report = apply_plan(&plan, dir.path(), "1.4.0");
    assert_eq!(report.failed(), 0, "{:?}", report.steps);
    assert_eq!(report.files.len(), 4);
    assert!(report
        .files
        .iter()
        .all(|(_, status)| matches!(status, FileStatus::Rewritten { .. })));
    assert!(report.files[0].0.ends_with("VerifyEmailPage.tsx"));
    assert!(report.files[3].0.ends_with("Blog.tsx"));
}

#[test]
fn test_verify_email_hook_goes_before_first_state_line() {
    let dir = setup_pages();
    let plan = load_from_path(bundled_plan("remaining-pages.toml")).unwrap();
    let _ = apply_plan(&plan, dir.path(), "1.4.0");

    let page = read_page(&dir, "VerifyEmailPage.tsx");
    assert!(page.contains(
        "export default function VerifyEmailPage() {\n  const { t } = useLanguage();\n  const [code, setCode]"
    ));
    assert_eq!(page.matches("useLanguage();").count(), 1);
    assert!(page.contains("toast.error(t(\"verifyEmail.errors.codeSendRetry\"))"));
    assert!(page.contains("toast.error(t(\"verifyEmail.errors.codeNotSent\"))"));
    assert!(page.contains("<Button>{t(\"verifyEmail.verifyCode\")}</Button>"));
}

#[test]
fn test_other_pages_get_hooks_and_keys() {
    let dir = setup_pages();
    let plan = load_from_path(bundled_plan("remaining-pages.toml")).unwrap();
    let _ = apply_plan(&plan, dir.path(), "1.4.0");

    let skin = read_page(&dir, "SkinEnhancement.tsx");
    assert!(skin.contains(
        "  const { user, isAuthenticated } = useAuth();\n  const { t } = useLanguage();\n"
    ));
    assert!(skin.contains("toast.error(t(\"skinEnhancement.errors.fileSizeLimit\"))"));

    let community = read_page(&dir, "CommunityCharacters.tsx");
    assert!(community.contains(
        "export default function CommunityCharacters() {\n  const { t } = useLanguage();\n  const [searchQuery"
    ));
    assert!(community.contains(
        "searchQuery ? t(\"communityCharacters.noResultsFound\") : t(\"communityCharacters.noCharactersYet\")"
    ));

    let blog = read_page(&dir, "Blog.tsx");
    assert!(blog.contains(
        "  const { t } = useLanguage();\n  const [searchQuery, setSearchQuery] = useState(\"\");"
    ));
    assert!(blog.contains("useState(t(\"blog.allCategories\"))"));
    assert!(blog.contains("category: selectedCategory === t(\"blog.allCategories\")"));
    assert!(blog.contains("categories || [t(\"blog.allCategories\")]"));
    assert!(!blog.contains("Tümü"));
}

#[test]
fn test_missing_page_does_not_block_the_others() {
    let dir = setup_pages();
    fs::remove_file(dir.path().join("client/src/pages/Blog.tsx")).unwrap();
    let plan = load_from_path(bundled_plan("remaining-pages.toml")).unwrap();

    let report = apply_plan(&plan, dir.path(), "1.4.0");
    assert_eq!(report.failed(), 3);
    assert!(read_page(&dir, "SkinEnhancement.tsx").contains("skinEnhancement.success.completed"));
}
