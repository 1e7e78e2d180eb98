//! Static signature tables.
//!
//! Every pattern is a literal substring compared case-insensitively by the
//! matcher. Declaration order is significant: single-valued results pick the
//! last matching entry, hosting providers pick the first.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
}

const fn sig(name: &'static str, patterns: &'static [&'static str]) -> Signature {
    Signature { name, patterns }
}

pub static BACKEND_FRAMEWORKS: &[Signature] = &[
    sig("Laravel", &["/vendor/laravel", "laravel"]),
    sig("Django", &["csrftoken", "django", "__admin_media_prefix__"]),
    sig("Ruby on Rails", &["rails", "ruby-on-rails", "rails-env"]),
    sig("Express", &["express", "express-session"]),
    sig("Spring", &["jsessionid", "spring", "spring-security"]),
    sig("ASP.NET", &[".aspx", "asp.net", "__viewstate"]),
    sig("CodeIgniter", &["ci_session", "codeigniter"]),
    sig("Symfony", &["symfony", "_symfony"]),
    sig("Yii", &["yii", "yiiframework"]),
    sig("Flask", &["flask", "flask-session"]),
    sig("FastAPI", &["fastapi"]),
    sig("NestJS", &["nestjs"]),
];

pub static CMS: &[Signature] = &[
    sig("WordPress", &["wp-content", "wp-includes", "wordpress"]),
    sig("Drupal", &["drupal", "sites/all", "drupal.js"]),
    sig("Joomla", &["joomla", "com_content", "mod_"]),
    sig("Magento", &["magento", "mage/", "mage."]),
    sig("Shopify", &["shopify", ".myshopify.com"]),
    sig("WooCommerce", &["woocommerce", "wc-"]),
    sig("PrestaShop", &["prestashop", "presta-"]),
    sig("OpenCart", &["opencart", "route=common"]),
    sig("MODX", &["modx", "assets/components"]),
    sig("Ghost", &["ghost", "ghost-sdk"]),
];

pub static DATABASES: &[Signature] = &[
    sig("MySQL", &["mysql", "mysqli"]),
    sig("PostgreSQL", &["pgsql", "postgresql"]),
    sig("MongoDB", &["mongodb", "mongoose"]),
    sig("SQLite", &["sqlite"]),
    sig("Redis", &["redis"]),
    sig("Oracle", &["oracle", "oci8"]),
    sig("Microsoft SQL", &["mssql", "sqlsrv"]),
];

/// Response header names whose presence reveals a cache layer.
pub static CACHE_HEADERS: &[Signature] = &[
    sig("Varnish", &["x-cache"]),
    sig("Drupal Cache", &["x-drupal-cache"]),
    sig("Cloudflare", &["cf-cache-status"]),
    sig("Magento Cache", &["x-magento-cache"]),
];

pub static JS_FRAMEWORKS: &[Signature] = &[
    sig("React", &["react", "reactjs", "react-dom", "jsx"]),
    sig("Vue.js", &["vue", "vuejs", "vue-router", "vuex"]),
    sig("Angular", &["angular", "ng-", "@angular"]),
    sig("Svelte", &["svelte"]),
    sig("jQuery", &["jquery", "jquery.min.js"]),
    sig("Next.js", &["next", "__next", "_next"]),
    sig("Nuxt.js", &["nuxt", "__nuxt", "_nuxt"]),
    sig("Alpine.js", &["alpine", "x-data"]),
    sig("Ember.js", &["ember"]),
    sig("Backbone.js", &["backbone"]),
    sig("Preact", &["preact"]),
    sig("Lit", &["lit-element", "lit-html"]),
];

pub static CSS_FRAMEWORKS: &[Signature] = &[
    sig("Bootstrap", &["bootstrap", "navbar-", "btn-"]),
    sig("Tailwind CSS", &["tailwind", "tw-"]),
    sig("Material UI", &["mui", "material-ui"]),
    sig("Bulma", &["bulma", "is-"]),
    sig("Foundation", &["foundation"]),
    sig("Semantic UI", &["semantic-ui", "ui segment"]),
    sig("Chakra UI", &["chakra"]),
    sig("Ant Design", &["ant-design", "antd"]),
    sig("Styled Components", &["styled-components"]),
    sig("SASS/SCSS", &[".scss", ".sass"]),
    sig("Less", &[".less"]),
];

pub static UI_LIBRARIES: &[Signature] = &[
    sig("Material Design", &["material-design", "md-"]),
    sig("Font Awesome", &["font-awesome", "fa-"]),
    sig("Feather Icons", &["feather-icons"]),
    sig("Material Icons", &["material-icons"]),
    sig("Chart.js", &["chart.js"]),
    sig("D3.js", &["d3.js", "d3.min.js"]),
    sig("Three.js", &["three.js"]),
    sig("Lodash", &["lodash"]),
    sig("Moment.js", &["moment.js"]),
    sig("Axios", &["axios"]),
];

pub static BUILD_TOOLS: &[Signature] = &[
    sig("Webpack", &["webpack", "__webpack"]),
    sig("Babel", &["babel"]),
    sig("Parcel", &["parcel"]),
    sig("Rollup", &["rollup"]),
    sig("Vite", &["vite"]),
    sig("Gulp", &["gulp"]),
    sig("Grunt", &["grunt"]),
];

pub static STATE_MANAGEMENT: &[Signature] = &[
    sig("Redux", &["redux", "react-redux"]),
    sig("Vuex", &["vuex"]),
    sig("MobX", &["mobx"]),
    sig("Recoil", &["recoil"]),
    sig("XState", &["xstate"]),
    sig("Pinia", &["pinia"]),
];

pub static TEST_FRAMEWORKS: &[Signature] = &[
    sig("Jest", &["jest"]),
    sig("Mocha", &["mocha"]),
    sig("Cypress", &["cypress"]),
    sig("Playwright", &["playwright"]),
    sig("Testing Library", &["testing-library"]),
    sig("Selenium", &["selenium"]),
];

// "ga" also hits unrelated words; kept as a known precision limitation.
pub static ANALYTICS: &[Signature] = &[
    sig("Google Analytics", &["ga", "gtag", "analytics"]),
    sig("Mixpanel", &["mixpanel"]),
    sig("Segment", &["segment"]),
    sig("Hotjar", &["hotjar"]),
    sig("Amplitude", &["amplitude"]),
];

pub static CDNS: &[Signature] = &[
    sig("Cloudflare", &["cloudflare"]),
    sig("jsDelivr", &["jsdelivr"]),
    sig("unpkg", &["unpkg"]),
    sig("Google CDN", &["googleapis"]),
    sig("Microsoft CDN", &["ajax.aspnetcdn.com"]),
    sig("CDNJS", &["cdnjs.cloudflare.com"]),
];

pub static HOSTING_PROVIDERS: &[Signature] = &[
    sig("Amazon AWS", &["amazonaws.com", "aws.amazon.com"]),
    sig("Google Cloud", &["googleusercontent.com", "cloud.google.com"]),
    sig("Microsoft Azure", &["azure.com", "azurewebsites.net"]),
    sig("DigitalOcean", &["digitalocean.com"]),
    sig("Heroku", &["herokuapp.com"]),
    sig("Cloudflare", &["cloudflare.com"]),
    sig("GoDaddy", &["godaddy.com"]),
    sig("Vercel", &["vercel.app"]),
    sig("Netlify", &["netlify.app"]),
];

#[cfg(test)]
pub(crate) const ALL_TABLES: &[(&str, &[Signature])] = &[
    ("backend-framework", BACKEND_FRAMEWORKS),
    ("cms", CMS),
    ("database", DATABASES),
    ("cache", CACHE_HEADERS),
    ("js-framework", JS_FRAMEWORKS),
    ("css-framework", CSS_FRAMEWORKS),
    ("ui-library", UI_LIBRARIES),
    ("build-tool", BUILD_TOOLS),
    ("state-management", STATE_MANAGEMENT),
    ("test-framework", TEST_FRAMEWORKS),
    ("analytics", ANALYTICS),
    ("cdn", CDNS),
    ("hosting-provider", HOSTING_PROVIDERS),
];
