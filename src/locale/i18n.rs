// UI strings for both languages. Keys are the ones the
// frontend already uses so it can fetch the whole table.

use std::collections::BTreeMap;
use std::collections::HashMap;
use lazy_static::lazy_static;
use super::Language;

const EN: &[(&str, &str)] = &[
  ("home", "Home"),
  ("about", "About Us"),
  ("contact", "Contact"),
  ("admin", "Admin"),
  ("youth-news-agency", "Youth News Agency"),
  ("latest-news", "Latest News"),
  ("featured-posts", "Featured Posts"),
  ("read-more", "Read More"),
  ("reading-time", "{{time}} min read"),
  ("published-on", "Published on"),
  ("by-author", "By {{author}}"),
  ("share-post", "Share Post"),
  ("related-posts", "Related Posts"),
  ("no-posts-found", "No posts found"),
  ("all-categories", "All Categories"),
  ("category", "Category"),
  ("tags", "Tags"),
  ("search", "Search"),
  ("search-placeholder", "Search articles..."),
  ("search-results", "Search Results"),
  ("no-results", "No results found for \"{{query}}\""),
  ("language", "Language"),
  ("theme", "Theme"),
  ("light-mode", "Light Mode"),
  ("dark-mode", "Dark Mode"),
  ("switch-to-arabic", "العربية"),
  ("switch-to-english", "English"),
  ("contact-us", "Contact Us"),
  ("name", "Name"),
  ("email", "Email"),
  ("message", "Message"),
  ("send-message", "Send Message"),
  ("message-sent", "Message sent successfully!"),
  ("required-field", "This field is required"),
  ("about-title", "About Youth News Agency"),
  ("about-description", "YNA is a dynamic platform dedicated to delivering the latest news and insights from a youth perspective. We cover diverse topics that matter to young people worldwide."),
  ("our-mission", "Our Mission"),
  ("our-vision", "Our Vision"),
  ("our-values", "Our Values"),
  ("total-posts", "Total Posts"),
  ("total-views", "Total Views"),
  ("messages", "Messages"),
  ("settings", "Settings"),
  ("all-rights-reserved", "All rights reserved"),
  ("follow-us", "Follow Us"),
  ("error-occurred", "An error occurred"),
  ("try-again", "Try Again"),
  ("loading", "Loading..."),
  ("page-not-found", "Page Not Found"),
  ("go-home", "Go Home"),
  ("too-many-requests", "Too many requests, please try again later"),
];

const AR: &[(&str, &str)] = &[
  ("home", "الرئيسية"),
  ("about", "من نحن"),
  ("contact", "اتصل بنا"),
  ("admin", "الإدارة"),
  ("youth-news-agency", "وكالة أنباء الشباب"),
  ("latest-news", "آخر الأخبار"),
  ("featured-posts", "المقالات المميزة"),
  ("read-more", "اقرأ المزيد"),
  ("reading-time", "{{time}} دقيقة قراءة"),
  ("published-on", "نُشر في"),
  ("by-author", "بواسطة {{author}}"),
  ("share-post", "شارك المقال"),
  ("related-posts", "مقالات ذات صلة"),
  ("no-posts-found", "لم يتم العثور على مقالات"),
  ("all-categories", "جميع الفئات"),
  ("category", "الفئة"),
  ("tags", "العلامات"),
  ("search", "بحث"),
  ("search-placeholder", "ابحث في المقالات..."),
  ("search-results", "نتائج البحث"),
  ("no-results", "لم يتم العثور على نتائج لـ \"{{query}}\""),
  ("language", "اللغة"),
  ("theme", "المظهر"),
  ("light-mode", "المظهر الفاتح"),
  ("dark-mode", "المظهر الداكن"),
  ("switch-to-arabic", "العربية"),
  ("switch-to-english", "English"),
  ("contact-us", "اتصل بنا"),
  ("name", "الاسم"),
  ("email", "البريد الإلكتروني"),
  ("message", "الرسالة"),
  ("send-message", "إرسال الرسالة"),
  ("message-sent", "تم إرسال الرسالة بنجاح!"),
  ("required-field", "هذا الحقل مطلوب"),
  ("about-title", "حول وكالة أنباء الشباب"),
  ("about-description", "وكالة أنباء الشباب منصة ديناميكية مخصصة لتقديم آخر الأخبار والرؤى من منظور الشباب. نحن نغطي مواضيع متنوعة تهم الشباب في جميع أنحاء العالم."),
  ("our-mission", "مهمتنا"),
  ("our-vision", "رؤيتنا"),
  ("our-values", "قيمنا"),
  ("total-posts", "إجمالي المقالات"),
  ("total-views", "إجمالي المشاهدات"),
  ("messages", "الرسائل"),
  ("settings", "الإعدادات"),
  ("all-rights-reserved", "جميع الحقوق محفوظة"),
  ("follow-us", "تابعنا"),
  ("error-occurred", "حدث خطأ"),
  ("try-again", "حاول مرة أخرى"),
  ("loading", "جاري التحميل..."),
  ("page-not-found", "الصفحة غير موجودة"),
  ("go-home", "العودة للرئيسية"),
  ("too-many-requests", "طلبات كثيرة جدا، يرجى المحاولة لاحقا"),
];

lazy_static! {
  static ref CATALOGUE: HashMap<Language, HashMap<&'static str, &'static str>> = {
    let mut catalogue = HashMap::new();
    catalogue.insert(Language::En, EN.iter().cloned().collect());
    catalogue.insert(Language::Ar, AR.iter().cloned().collect());
    catalogue
  };
}

// Falls back to English, then to the key itself so a
// missing string is visible but never breaks a page.
pub fn translate(language: Language, key: &str) -> String {
  CATALOGUE.get(&language)
    .and_then(|table| table.get(key))
    .or_else(|| CATALOGUE.get(&Language::En).and_then(|table| table.get(key)))
    .map(|s| s.to_string())
    .unwrap_or_else(|| key.to_string())
}

// Replaces {{name}} placeholders.
pub fn translate_with(language: Language, key: &str, vars: &[(&str, &str)]) -> String {
  let mut text = translate(language, key);
  for (name, value) in vars {
    text = text.replace(&format!("{{{{{}}}}}", name), value);
  }
  text
}

// Sorted so the JSON output is stable.
pub fn catalogue(language: Language) -> BTreeMap<&'static str, &'static str> {
  CATALOGUE.get(&language)
    .map(|table| table.iter().map(|(k, v)| (*k, *v)).collect())
    .unwrap_or_default()
}
